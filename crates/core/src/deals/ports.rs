//! Port interfaces for deal persistence
//!
//! The remote data store owns every deal; these traits are the only way the
//! core reads or changes one.

use async_trait::async_trait;
use dealflow_domain::{Deal, DealDraft, Result, Stage};

/// Trait for reading and mutating deals on the remote data store
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// List every deal visible to the session
    async fn list(&self) -> Result<Vec<Deal>>;

    /// Create a deal from a validated draft
    async fn create(&self, draft: &DealDraft) -> Result<Deal>;

    /// Replace the writable fields of a deal
    async fn update(&self, id: &str, draft: &DealDraft) -> Result<Deal>;

    /// Change only the stage of a deal, leaving every other field untouched
    async fn update_stage(&self, id: &str, stage: Stage) -> Result<Deal>;

    /// Delete a deal
    async fn delete(&self, id: &str) -> Result<()>;
}
