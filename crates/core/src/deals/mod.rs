//! Deal lifecycle: create, edit and delete through the remote data store

pub mod ports;
pub mod service;

pub use service::{BatchDeleteSummary, DealService, PortfolioSummary};
