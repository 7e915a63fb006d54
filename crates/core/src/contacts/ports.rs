//! Port interfaces for contacts and companies

use async_trait::async_trait;
use dealflow_domain::{Company, Contact, ContactDraft, Result};

/// Access to the contact book
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>>;

    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact>;

    /// Full replacement of the writable fields of contact `id`.
    async fn update_contact(&self, id: &str, draft: &ContactDraft) -> Result<Contact>;

    async fn delete_contact(&self, id: &str) -> Result<()>;
}
