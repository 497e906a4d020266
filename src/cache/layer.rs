//! In-memory query cache with a freshness window and per-key single-flight.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use super::traits::{CacheResult, Lookup};
use crate::error::CatalogResult;

type SharedFetch<V> = Shared<BoxFuture<'static, CatalogResult<V>>>;

struct InFlight<V: Clone> {
  generation: u64,
  future: SharedFetch<V>,
}

struct Slot<V: Clone> {
  value: Option<(V, Instant)>,
  in_flight: Option<InFlight<V>>,
}

impl<V: Clone> Default for Slot<V> {
  fn default() -> Self {
    Self {
      value: None,
      in_flight: None,
    }
  }
}

/// Query cache that sits between views and the network client.
///
/// - a fresh entry is returned without calling the fetcher
/// - concurrent fetches of the same key share one outstanding request
/// - failed fetches are not stored and leave the previous entry in place
///
/// Slots for different keys are independent; nothing invalidates other
/// keys. The mutex is only held for map bookkeeping, never across an await.
pub struct QueryCache<K, V: Clone> {
  slots: Arc<Mutex<HashMap<K, Slot<V>>>>,
  generation: Arc<AtomicU64>,
  /// How long before cached data is considered stale
  stale_time: Duration,
}

impl<K, V> QueryCache<K, V>
where
  K: Eq + Hash + Clone + std::fmt::Debug,
  V: Clone + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      slots: Arc::new(Mutex::new(HashMap::new())),
      generation: Arc::new(AtomicU64::new(0)),
      stale_time: Duration::from_secs(5 * 60),
    }
  }

  /// Set the freshness window.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
    // Slots are only touched by short non-panicking sections
    self.slots.lock().unwrap_or_else(|e| e.into_inner())
  }

  fn is_stale(&self, fetched_at: Instant) -> bool {
    fetched_at.elapsed() > self.stale_time
  }

  /// Look at a slot without fetching.
  pub fn peek(&self, key: &K) -> Lookup<V> {
    let slots = self.slots();
    match slots.get(key) {
      Some(Slot {
        value: Some((value, fetched_at)),
        ..
      }) => {
        if self.is_stale(*fetched_at) {
          Lookup::Stale(value.clone())
        } else {
          Lookup::Fresh(value.clone())
        }
      }
      Some(Slot {
        in_flight: Some(_), ..
      }) => Lookup::Pending,
      _ => Lookup::Miss,
    }
  }

  /// Fetch with cache-first strategy.
  ///
  /// 1. Fresh entry: return it, the fetcher is not called
  /// 2. Request already in flight for this key: await that one
  /// 3. Otherwise start `fetcher`, store its result on success
  pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> CatalogResult<CacheResult<V>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = CatalogResult<V>> + Send + 'static,
  {
    let (generation, future) = {
      let mut slots = self.slots();
      let slot = slots.entry(key.clone()).or_default();

      if let Some((value, fetched_at)) = &slot.value {
        if !self.is_stale(*fetched_at) {
          tracing::trace!(?key, "cache hit");
          return Ok(CacheResult::from_cache(value.clone()));
        }
      }

      let joined = slot
        .in_flight
        .as_ref()
        .map(|f| (f.generation, f.future.clone()));

      match joined {
        Some(pending) => {
          tracing::trace!(?key, "joining in-flight request");
          pending
        }
        None => {
          tracing::debug!(?key, "cache miss, fetching");
          let generation = self.generation.fetch_add(1, Ordering::Relaxed);
          let future = fetcher().boxed().shared();
          slot.in_flight = Some(InFlight {
            generation,
            future: future.clone(),
          });
          (generation, future)
        }
      }
    };

    let result = future.await;
    self.settle(&key, generation, &result);
    result.map(CacheResult::from_network)
  }

  /// Record the outcome of request `generation`. Only the first waiter to
  /// get here for that generation touches the slot.
  fn settle(&self, key: &K, generation: u64, result: &CatalogResult<V>) {
    let mut slots = self.slots();
    let Some(slot) = slots.get_mut(key) else {
      return;
    };
    if !matches!(&slot.in_flight, Some(f) if f.generation == generation) {
      return;
    }

    slot.in_flight = None;
    match result {
      Ok(value) => slot.value = Some((value.clone(), Instant::now())),
      Err(e) => tracing::warn!(?key, error = %e, "fetch failed, keeping previous entry"),
    }
  }

  /// Drop the cached value for `key` so the next fetch goes to the network.
  ///
  /// An in-flight request is left alone and will still populate the slot.
  pub fn invalidate(&self, key: &K) {
    if let Some(slot) = self.slots().get_mut(key) {
      slot.value = None;
    }
  }
}

impl<K, V> Default for QueryCache<K, V>
where
  K: Eq + Hash + Clone + std::fmt::Debug,
  V: Clone + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V: Clone> Clone for QueryCache<K, V> {
  fn clone(&self) -> Self {
    Self {
      slots: Arc::clone(&self.slots),
      generation: Arc::clone(&self.generation),
      stale_time: self.stale_time,
    }
  }
}
