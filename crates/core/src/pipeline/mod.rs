//! Sales pipeline: stage projection and stage transitions

pub mod projection;
pub mod transition;

pub use projection::{project, PipelineFilter, PipelineProjection, PipelineStage};
pub use transition::{MoveOrigin, RejectReason, StageMove, StageTransitionController, TransitionOutcome};
