//! Port for the pre-aggregated dashboard report.

use async_trait::async_trait;
use dealflow_domain::{DashboardReport, Result};

/// Read access to server-side reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Fetch the dashboard metrics, pipeline aggregate and recent activity
    async fn dashboard(&self) -> Result<DashboardReport>;
}
