//! Pipeline board commands
//!
//! # Commands
//!
//! - `get_pipeline_board` - Deals grouped by stage with counts and totals
//! - `get_stage_summaries` - Serializable per-stage totals for dashboards
//! - `move_deal_on_board` - Drag-and-drop move between board columns
//! - `set_deal_stage` - Stage change from the deal editor

use std::time::Instant;

use dealflow_core::{project, PipelineFilter, PipelineProjection, StageMove, TransitionOutcome};
use dealflow_domain::{Result, Stage};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;
use crate::utils::logging::log_command_execution;

/// Per-stage totals in the shape a frontend renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub stage: Stage,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
    pub total_value: Decimal,
}

/// Project the current deal list onto the pipeline stages.
///
/// # Errors
/// Returns the fetch error when no deal snapshot is available.
pub async fn get_pipeline_board(
    ctx: &AppContext,
    filter: &PipelineFilter,
) -> Result<PipelineProjection> {
    execute_logged("pipeline::get_pipeline_board", || async {
        let deals = ctx.cache.deals().await.into_result()?;
        Ok(project(&deals, filter))
    })
    .await
}

/// Stage totals over every deal, all six stages included.
///
/// # Errors
/// Returns the fetch error when no deal snapshot is available.
pub async fn get_stage_summaries(ctx: &AppContext) -> Result<Vec<StageSummary>> {
    execute_logged("pipeline::get_stage_summaries", || async {
        let deals = ctx.cache.deals().await.into_result()?;
        let projection = project(&deals, &PipelineFilter::all());
        Ok(projection
            .stages
            .iter()
            .map(|entry| StageSummary {
                stage: entry.stage,
                label: entry.stage.label(),
                color: entry.stage.color(),
                count: entry.count,
                total_value: entry.total_value,
            })
            .collect())
    })
    .await
}

/// Move a deal between board columns.
///
/// Failures are reported through the outcome and a notification.
pub async fn move_deal_on_board(
    ctx: &AppContext,
    deal_id: &str,
    from: Stage,
    to: Stage,
) -> TransitionOutcome {
    let start = Instant::now();
    let outcome = ctx.transitions.request_transition(StageMove::board(deal_id, from, to)).await;
    log_outcome("pipeline::move_deal_on_board", start, &outcome);
    outcome
}

/// Change a deal's stage from the editor. Unlike the board, this can reach
/// `ClosedLost`.
pub async fn set_deal_stage(ctx: &AppContext, deal_id: &str, to: Stage) -> TransitionOutcome {
    let start = Instant::now();
    let outcome = ctx.transitions.move_deal(deal_id, to).await;
    log_outcome("pipeline::set_deal_stage", start, &outcome);
    outcome
}

fn log_outcome(command_name: &str, start: Instant, outcome: &TransitionOutcome) {
    let error = match outcome {
        TransitionOutcome::Failed(err) => Some(err),
        _ => None,
    };
    log_command_execution(command_name, start.elapsed(), error);
}
