//! Caching layer between list views and the catalog client.
//!
//! This module provides an in-memory query cache that:
//! - Memoizes results per query key with a freshness window
//! - Shares a single in-flight request between concurrent callers of a key
//! - Exposes a synchronous peek for rendering cached or stale data

mod layer;
mod traits;

pub use layer::QueryCache;
pub use traits::{CacheResult, CacheSource, Lookup};
