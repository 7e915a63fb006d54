//! Dashboard report returned by the remote data store

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contact::ContactSummary;
use super::stage::Stage;
use crate::utils::lenient::null_as_default;

/// Pre-aggregated dashboard payload.
///
/// Every aggregate tolerates both a missing key and an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: DashboardMetrics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipeline: Vec<PipelineStageReport>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_activities: Vec<RecentActivity>,
}

impl DashboardReport {
    pub fn stage(&self, stage: Stage) -> Option<&PipelineStageReport> {
        self.pipeline.iter().find(|entry| entry.stage == stage)
    }
}

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_leads: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_contacts: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_deals: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_companies: u64,
}

/// Server-side aggregate for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStageReport {
    pub stage: Stage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_value: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deals: Vec<DealSummary>,
}

/// Compact deal record carried inside the pipeline report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub contact: Option<ContactSummary>,
}

/// Entry of the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub title: String,
    #[serde(default)]
    pub contact: Option<ContactSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
