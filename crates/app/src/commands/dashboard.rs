//! Dashboard report commands

use std::sync::Arc;

use dealflow_core::ResourceKey;
use dealflow_domain::{DashboardReport, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Server-computed dashboard report, served from the cache when fresh.
///
/// # Errors
/// Returns the fetch error when no report snapshot is available.
pub async fn get_dashboard(ctx: &AppContext) -> Result<Arc<DashboardReport>> {
    execute_logged("dashboard::get_dashboard", || async {
        ctx.cache.dashboard().await.into_result()
    })
    .await
}

/// Drop the cached report and fetch it again.
///
/// # Errors
/// Returns the fetch error when the refetch fails and no snapshot remains.
pub async fn refresh_dashboard(ctx: &AppContext) -> Result<Arc<DashboardReport>> {
    execute_logged("dashboard::refresh_dashboard", || async {
        ctx.cache.invalidate(ResourceKey::Dashboard);
        ctx.cache.dashboard().await.into_result()
    })
    .await
}
