//! Key-value stores for UI preferences and the login session.
//!
//! Two scopes exist:
//! - durable: survives restarts (SQLite file in the data directory)
//! - session: lives as long as the process (in-memory map)
//!
//! Nothing here is a source of truth; the stores only remember what the
//! user was looking at and who they were logged in as.

mod memory;
mod sqlite;

use color_eyre::Result;
use std::sync::Arc;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// String-keyed store of string values.
pub trait KeyValueStore: Send + Sync {
  /// Read a value, `None` if the key was never written or was removed
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Write a value, replacing any previous one
  fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Remove a key; removing a missing key is not an error
  fn remove(&self, key: &str) -> Result<()>;
}

/// Durable and session-scoped stores, passed around together.
#[derive(Clone)]
pub struct Stores {
  pub durable: Arc<dyn KeyValueStore>,
  pub session: Arc<dyn KeyValueStore>,
}

impl Stores {
  /// Open the durable store at its default location with a fresh session store.
  pub fn open() -> Result<Self> {
    Ok(Self {
      durable: Arc::new(SqliteStore::open()?),
      session: Arc::new(MemoryStore::new()),
    })
  }

  /// Both scopes in memory.
  #[cfg(test)]
  pub fn in_memory() -> Self {
    Self {
      durable: Arc::new(MemoryStore::new()),
      session: Arc::new(MemoryStore::new()),
    }
  }
}
