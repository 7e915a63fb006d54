//! # DealFlow Core
//!
//! Pure client-side business logic - no HTTP or platform code.
//!
//! This crate contains:
//! - Port interfaces (traits) for the remote data store and notifications
//! - The query cache that owns every fetched snapshot
//! - Pipeline projection and the stage transition controller
//! - Deal and contact services
//!
//! ## Architecture Principles
//! - Only depends on `dealflow-domain`
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod contacts;
pub mod deals;
pub mod pipeline;
pub mod query;

// Infrastructure ports
pub mod notification_ports;
pub mod report_ports;

// Re-export specific items to avoid ambiguity
pub use contacts::ports::ContactRepository;
pub use contacts::{ContactDirectory, ContactService};
pub use deals::ports::DealRepository;
pub use deals::{BatchDeleteSummary, DealService, PortfolioSummary};
pub use notification_ports::Notifier;
pub use pipeline::projection::{project, PipelineFilter, PipelineProjection, PipelineStage};
pub use pipeline::transition::{
    MoveOrigin, RejectReason, StageMove, StageTransitionController, TransitionOutcome,
};
pub use query::{
    CacheEvent, CacheEventKind, QueryCache, QueryState, RepositorySource, Resource, ResourceKey,
    ResourceSource,
};
pub use report_ports::ReportRepository;
