//! Contact book: cached lookup and search plus CRUD

pub mod directory;
pub mod ports;
pub mod service;

pub use directory::ContactDirectory;
pub use service::ContactService;
