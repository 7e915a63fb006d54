//! Contact and company commands

use dealflow_core::BatchDeleteSummary;
use dealflow_domain::{Company, Contact, ContactDraft, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;
use crate::utils::logging::log_command_execution;

/// Contacts matching `query` by name, email or company. A blank query
/// returns every contact.
///
/// # Errors
/// Returns the fetch error when no contact snapshot is available.
pub async fn search_contacts(ctx: &AppContext, query: &str) -> Result<Vec<Contact>> {
    execute_logged("contacts::search_contacts", || ctx.directory.search(query)).await
}

/// # Errors
/// Returns the fetch error when no company snapshot is available.
pub async fn list_companies(ctx: &AppContext) -> Result<Vec<Company>> {
    execute_logged("contacts::list_companies", || async {
        let companies = ctx.directory.companies().await.into_result()?;
        Ok(companies.as_ref().clone())
    })
    .await
}

/// # Errors
/// `InvalidInput` for a malformed draft, otherwise the remote failure.
pub async fn create_contact(ctx: &AppContext, draft: &ContactDraft) -> Result<Contact> {
    execute_logged("contacts::create_contact", || ctx.contacts.create(draft)).await
}

/// # Errors
/// `InvalidInput` for a malformed draft, otherwise the remote failure.
pub async fn update_contact(ctx: &AppContext, id: &str, draft: &ContactDraft) -> Result<Contact> {
    execute_logged("contacts::update_contact", || ctx.contacts.update(id, draft)).await
}

/// # Errors
/// Returns the remote failure; cached snapshots are left as they were.
pub async fn delete_contact(ctx: &AppContext, id: &str) -> Result<()> {
    execute_logged("contacts::delete_contact", || ctx.contacts.delete(id)).await
}

/// Delete several contacts. Partial failure is reported in the summary.
pub async fn delete_contacts(ctx: &AppContext, ids: &[String]) -> BatchDeleteSummary {
    let start = std::time::Instant::now();
    let summary = ctx.contacts.delete_many(ids).await;
    log_command_execution("contacts::delete_contacts", start.elapsed(), None);
    summary
}
