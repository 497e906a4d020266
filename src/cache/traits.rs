//! Result and lookup types shared by the cache layer and its callers.

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
    }
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network (possibly shared with a concurrent caller)
  Network,
  /// Data from cache, still inside the freshness window
  CacheFresh,
}

/// Synchronous view of a cache slot, for rendering without awaiting.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
  /// Cached and inside the freshness window
  Fresh(T),
  /// Cached but past the freshness window; may be shown while refetching
  Stale(T),
  /// Nothing cached yet, a request is in flight
  Pending,
  /// Nothing cached, nothing in flight
  Miss,
}
