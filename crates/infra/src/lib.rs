//! # DealFlow Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with retry and timeouts
//! - CRM API client, session and repository adapters
//! - Configuration loading from environment and files
//! - Conversions from external errors into domain errors
//!
//! ## Architecture
//! - Implements traits defined in `dealflow-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError, CrmApi, Session};
pub use errors::InfraError;
pub use http::HttpClient;
