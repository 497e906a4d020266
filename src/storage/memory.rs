use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;

/// Session-scoped store; contents vanish when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
  values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(values.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    values.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    let mut values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    values.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_set_get_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("authToken").unwrap(), None);

    store.set("authToken", "abc").unwrap();
    store.set("authToken", "def").unwrap();
    assert_eq!(store.get("authToken").unwrap().as_deref(), Some("def"));

    store.remove("authToken").unwrap();
    store.remove("authToken").unwrap();
    assert_eq!(store.get("authToken").unwrap(), None);
  }
}
