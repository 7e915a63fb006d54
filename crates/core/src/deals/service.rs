//! Deal CRUD on top of the remote repository and the query cache.

use std::sync::Arc;

use dealflow_domain::constants::{
    MSG_DEAL_CREATED, MSG_DEAL_CREATE_FAILED, MSG_DEAL_DELETED, MSG_DEAL_DELETE_FAILED,
    MSG_DEAL_UPDATED, MSG_DEAL_UPDATE_FAILED,
};
use dealflow_domain::{Deal, DealDraft, Notification, Result};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use super::ports::DealRepository;
use crate::notification_ports::Notifier;
use crate::query::{QueryCache, ResourceKey};

/// Outcome of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteSummary {
    pub deleted: usize,
    /// Ids the remote store refused to delete.
    pub failed: Vec<String>,
}

impl BatchDeleteSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Totals over the cached deal list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub count: usize,
}

/// Create, update and delete deals.
///
/// Every successful mutation invalidates the deal list and the dashboard;
/// a failed one leaves the cache as it was.
pub struct DealService {
    deals: Arc<dyn DealRepository>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
}

impl DealService {
    pub fn new(
        deals: Arc<dyn DealRepository>,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { deals, cache, notifier }
    }

    /// Create a deal from `draft`.
    ///
    /// # Errors
    /// `InvalidInput` for a malformed draft (nothing is sent), otherwise
    /// whatever the repository reports.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &DealDraft) -> Result<Deal> {
        draft.validate()?;
        let result = self.deals.create(draft).await;
        self.finish(result, MSG_DEAL_CREATED, MSG_DEAL_CREATE_FAILED)
    }

    /// Replace the writable fields of deal `id`.
    ///
    /// # Errors
    /// Same as [`DealService::create`].
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: &str, draft: &DealDraft) -> Result<Deal> {
        draft.validate()?;
        let result = self.deals.update(id, draft).await;
        self.finish(result, MSG_DEAL_UPDATED, MSG_DEAL_UPDATE_FAILED)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = self.deals.delete(id).await;
        self.finish(result, MSG_DEAL_DELETED, MSG_DEAL_DELETE_FAILED)
    }

    /// Delete each id in turn. Failures do not stop the batch.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_many(&self, ids: &[String]) -> BatchDeleteSummary {
        let mut summary = BatchDeleteSummary::default();
        if ids.is_empty() {
            return summary;
        }
        for id in ids {
            match self.deals.delete(id).await {
                Ok(()) => summary.deleted += 1,
                Err(err) => {
                    warn!(deal_id = %id, error = %err, "batch delete item failed");
                    summary.failed.push(id.clone());
                }
            }
        }

        if summary.deleted > 0 {
            self.cache.invalidate_many(&ResourceKey::DEAL_DEPENDENTS);
        }

        let notification = if summary.is_complete() {
            Notification::success(format!("{} opportunities deleted", summary.deleted))
        } else {
            Notification::error(format!(
                "{} of {} opportunities could not be deleted",
                summary.failed.len(),
                ids.len()
            ))
        };
        self.notifier.notify(notification);
        info!(deleted = summary.deleted, failed = summary.failed.len(), "batch delete finished");
        summary
    }

    /// Total value and count of the cached deal list.
    ///
    /// # Errors
    /// Propagates the fetch error when no snapshot is available.
    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary> {
        let deals = self.cache.deals().await.into_result()?;
        Ok(PortfolioSummary {
            total_value: deals.iter().map(Deal::value_or_zero).sum(),
            count: deals.len(),
        })
    }

    fn finish<T>(&self, result: Result<T>, success: &str, failure: &str) -> Result<T> {
        match result {
            Ok(value) => {
                self.cache.invalidate_many(&ResourceKey::DEAL_DEPENDENTS);
                self.notifier.notify(Notification::success(success));
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "deal mutation failed");
                self.notifier.notify(Notification::error(failure));
                Err(err)
            }
        }
    }
}
