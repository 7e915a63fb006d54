//! Client-side query cache
//!
//! Every view reads remote collections through a single [`QueryCache`],
//! keyed by [`ResourceKey`]. Mutations invalidate the keys they affect and
//! the next read refetches.

pub mod cache;
pub mod key;
pub mod ports;

pub use cache::{CacheEvent, CacheEventKind, QueryCache, QueryState};
pub use key::{Resource, ResourceKey};
pub use ports::{RepositorySource, ResourceSource};
