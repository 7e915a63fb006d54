//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Remote data store defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_READ_ATTEMPTS: usize = 3;

// Probability bands used for deal health colouring
pub const STRONG_PROBABILITY_THRESHOLD: u8 = 70;
pub const MODERATE_PROBABILITY_THRESHOLD: u8 = 40;
pub const MAX_PROBABILITY: u8 = 100;

// User-facing notification texts
pub const MSG_MOVE_FAILED: &str = "Could not move opportunity";
pub const MSG_MOVE_PENDING: &str = "Opportunity is still being moved";
pub const MSG_MOVE_REJECTED_LOST: &str = "Lost opportunities cannot be moved on the board";
pub const MSG_DEAL_CREATED: &str = "Opportunity created";
pub const MSG_DEAL_CREATE_FAILED: &str = "Could not create opportunity";
pub const MSG_DEAL_UPDATED: &str = "Opportunity updated";
pub const MSG_DEAL_UPDATE_FAILED: &str = "Could not update opportunity";
pub const MSG_DEAL_DELETED: &str = "Opportunity deleted";
pub const MSG_DEAL_DELETE_FAILED: &str = "Could not delete opportunity";
pub const MSG_CONTACT_CREATED: &str = "Contact created";
pub const MSG_CONTACT_CREATE_FAILED: &str = "Could not create contact";
pub const MSG_CONTACT_UPDATED: &str = "Contact updated";
pub const MSG_CONTACT_UPDATE_FAILED: &str = "Could not update contact";
pub const MSG_CONTACT_DELETED: &str = "Contact deleted";
pub const MSG_CONTACT_DELETE_FAILED: &str = "Could not delete contact";
