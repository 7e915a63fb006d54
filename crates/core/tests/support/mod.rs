//! Shared test helpers for `dealflow-core` integration tests.
//!
//! These helpers provide in-memory repositories and a recording notifier so
//! that pipeline and deal tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod fixtures;
pub mod notifier;
pub mod repositories;
