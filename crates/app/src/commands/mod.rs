//! Command functions - the surface a UI layer calls into

mod contacts;
mod dashboard;
mod deals;
mod pipeline;
mod session;

pub use contacts::*;
pub use dashboard::*;
pub use deals::*;
pub use pipeline::*;
pub use session::*;
