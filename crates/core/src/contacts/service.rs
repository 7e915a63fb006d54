//! Contact CRUD on top of the remote repository and the query cache.

use std::sync::Arc;

use dealflow_domain::constants::{
    MSG_CONTACT_CREATED, MSG_CONTACT_CREATE_FAILED, MSG_CONTACT_DELETED,
    MSG_CONTACT_DELETE_FAILED, MSG_CONTACT_UPDATED, MSG_CONTACT_UPDATE_FAILED,
};
use dealflow_domain::{Contact, ContactDraft, Notification, Result};
use tracing::{info, instrument, warn};

use super::ports::ContactRepository;
use crate::deals::BatchDeleteSummary;
use crate::notification_ports::Notifier;
use crate::query::{QueryCache, ResourceKey};

/// Create, update and delete contacts.
///
/// A successful mutation invalidates the contact list together with the
/// deals and dashboard that embed contact data. A failed one leaves the
/// cache untouched.
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
}

impl ContactService {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { contacts, cache, notifier }
    }

    /// # Errors
    /// `InvalidInput` for a malformed draft (nothing is sent), otherwise
    /// whatever the repository reports.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ContactDraft) -> Result<Contact> {
        draft.validate()?;
        let result = self.contacts.create_contact(draft).await;
        self.finish(result, MSG_CONTACT_CREATED, MSG_CONTACT_CREATE_FAILED)
    }

    /// # Errors
    /// Same as [`ContactService::create`].
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: &str, draft: &ContactDraft) -> Result<Contact> {
        draft.validate()?;
        let result = self.contacts.update_contact(id, draft).await;
        self.finish(result, MSG_CONTACT_UPDATED, MSG_CONTACT_UPDATE_FAILED)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = self.contacts.delete_contact(id).await;
        self.finish(result, MSG_CONTACT_DELETED, MSG_CONTACT_DELETE_FAILED)
    }

    /// Delete each id in turn and report once for the whole batch.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_many(&self, ids: &[String]) -> BatchDeleteSummary {
        let mut summary = BatchDeleteSummary::default();
        if ids.is_empty() {
            return summary;
        }
        for id in ids {
            match self.contacts.delete_contact(id).await {
                Ok(()) => summary.deleted += 1,
                Err(err) => {
                    warn!(contact_id = %id, error = %err, "batch delete item failed");
                    summary.failed.push(id.clone());
                }
            }
        }

        if summary.deleted > 0 {
            self.cache.invalidate_many(&ResourceKey::CONTACT_DEPENDENTS);
        }

        let notification = if summary.is_complete() {
            Notification::success(format!("{} contacts deleted", summary.deleted))
        } else {
            Notification::error(format!(
                "{} of {} contacts could not be deleted",
                summary.failed.len(),
                ids.len()
            ))
        };
        self.notifier.notify(notification);
        info!(deleted = summary.deleted, failed = summary.failed.len(), "contact batch delete finished");
        summary
    }

    fn finish<T>(&self, result: Result<T>, success: &str, failure: &str) -> Result<T> {
        match result {
            Ok(value) => {
                self.cache.invalidate_many(&ResourceKey::CONTACT_DEPENDENTS);
                self.notifier.notify(Notification::success(success));
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "contact mutation failed");
                self.notifier.notify(Notification::error(failure));
                Err(err)
            }
        }
    }
}
