//! Pipeline projection: deals grouped by stage with counts and totals
//!
//! The projection is a pure function of the deal list. Nothing here keeps
//! counters between calls; every view recomputes from the current snapshot.

use dealflow_domain::{Deal, Stage};
use rust_decimal::Decimal;

/// Optional narrowing applied to each deal before grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineFilter {
    /// Case-insensitive substring of the deal title or contact name.
    pub query: Option<String>,
    /// Keep only deals currently in this stage.
    pub stage: Option<Stage>,
}

impl PipelineFilter {
    /// Filter that keeps every deal.
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }
}

/// Aggregate for a single stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStage {
    pub stage: Stage,
    pub count: usize,
    pub total_value: Decimal,
    /// Member deals in input order.
    pub deals: Vec<Deal>,
}

impl PipelineStage {
    fn empty(stage: Stage) -> Self {
        Self { stage, count: 0, total_value: Decimal::ZERO, deals: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Result of [`project`]: one entry per stage plus grand totals.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineProjection {
    /// Every stage in presentation order, including empty ones.
    pub stages: Vec<PipelineStage>,
    pub total_value: Decimal,
    pub total_deals: usize,
}

impl PipelineProjection {
    pub fn stage(&self, stage: Stage) -> Option<&PipelineStage> {
        self.stages.iter().find(|entry| entry.stage == stage)
    }

    /// Stages that have at least one deal.
    pub fn non_empty(&self) -> impl Iterator<Item = &PipelineStage> {
        self.stages.iter().filter(|entry| !entry.is_empty())
    }

    /// Columns shown on the interactive board (everything but lost deals).
    pub fn board_columns(&self) -> impl Iterator<Item = &PipelineStage> {
        self.stages.iter().filter(|entry| entry.stage.is_on_board())
    }

    /// Stage that currently holds `deal_id`, if the deal passed the filter.
    pub fn stage_of(&self, deal_id: &str) -> Option<Stage> {
        self.stages
            .iter()
            .find(|entry| entry.deals.iter().any(|deal| deal.id == deal_id))
            .map(|entry| entry.stage)
    }
}

/// Group `deals` by stage after applying `filter`.
///
/// A missing deal value contributes zero to every total.
pub fn project(deals: &[Deal], filter: &PipelineFilter) -> PipelineProjection {
    let needle = filter.needle();
    let mut stages: Vec<PipelineStage> = Stage::ALL.into_iter().map(PipelineStage::empty).collect();

    let kept = deals.iter().filter(|deal| {
        let stage_ok = filter.stage.is_none() || filter.stage == Some(deal.stage);
        let query_ok = match needle.as_deref() {
            Some(needle) => deal.matches_query(needle),
            None => true,
        };
        stage_ok && query_ok
    });

    for deal in kept {
        // Stage::ALL is indexed in declaration order.
        let slot = &mut stages[deal.stage as usize];
        slot.count += 1;
        slot.total_value += deal.value_or_zero();
        slot.deals.push(deal.clone());
    }

    let total_value = stages.iter().map(|entry| entry.total_value).sum();
    let total_deals = stages.iter().map(|entry| entry.count).sum();

    PipelineProjection { stages, total_value, total_deals }
}
