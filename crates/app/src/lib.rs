//! # DealFlow App
//!
//! Application layer - command functions and main entry point.
//!
//! This crate contains:
//! - Command functions a UI layer calls (board, deals, contacts, dashboard, session)
//! - Application context (dependency injection)
//! - Notification centre for user-facing toasts
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod notifications;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use notifications::NotificationCenter;
