//! Deal commands

use std::sync::Arc;

use dealflow_core::{BatchDeleteSummary, PortfolioSummary};
use dealflow_domain::{Deal, DealDraft, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;
use crate::utils::logging::log_command_execution;

/// Cached deal list, optionally narrowed by a case-insensitive search over
/// title and contact name.
///
/// # Errors
/// Returns the fetch error when no deal snapshot is available.
pub async fn list_deals(ctx: &AppContext, query: Option<&str>) -> Result<Vec<Deal>> {
    execute_logged("deals::list_deals", || async {
        let deals: Arc<Vec<Deal>> = ctx.cache.deals().await.into_result()?;
        let needle = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);
        Ok(match needle {
            Some(needle) => deals.iter().filter(|deal| deal.matches_query(&needle)).cloned().collect(),
            None => deals.as_ref().clone(),
        })
    })
    .await
}

/// # Errors
/// `InvalidInput` for a malformed draft, otherwise the remote failure.
pub async fn create_deal(ctx: &AppContext, draft: &DealDraft) -> Result<Deal> {
    execute_logged("deals::create_deal", || ctx.deals.create(draft)).await
}

/// # Errors
/// `InvalidInput` for a malformed draft, otherwise the remote failure.
pub async fn update_deal(ctx: &AppContext, id: &str, draft: &DealDraft) -> Result<Deal> {
    execute_logged("deals::update_deal", || ctx.deals.update(id, draft)).await
}

/// # Errors
/// Returns the remote failure; the cached list is left as it was.
pub async fn delete_deal(ctx: &AppContext, id: &str) -> Result<()> {
    execute_logged("deals::delete_deal", || ctx.deals.delete(id)).await
}

/// Delete several deals. Partial failure is reported in the summary.
pub async fn delete_deals(ctx: &AppContext, ids: &[String]) -> BatchDeleteSummary {
    let start = std::time::Instant::now();
    let summary = ctx.deals.delete_many(ids).await;
    log_command_execution("deals::delete_deals", start.elapsed(), None);
    summary
}

/// # Errors
/// Returns the fetch error when no deal snapshot is available.
pub async fn get_portfolio_summary(ctx: &AppContext) -> Result<PortfolioSummary> {
    execute_logged("deals::get_portfolio_summary", || ctx.deals.portfolio_summary()).await
}
