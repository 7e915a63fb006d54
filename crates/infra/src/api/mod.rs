//! CRM API client
//!
//! Bearer-authenticated JSON client for the remote data store and the
//! adapters that expose it through the core repository ports.
//!
//! - Reads retry transient failures with exponential backoff
//! - Mutations are sent exactly once
//! - A missing session token fails locally without a request

pub mod auth;
pub mod client;
pub mod crm;
pub mod errors;

pub use auth::{AccessTokenProvider, Session};
pub use client::{ApiClient, ApiClientConfig};
pub use crm::CrmApi;
pub use errors::{ApiError, ApiErrorCategory};
