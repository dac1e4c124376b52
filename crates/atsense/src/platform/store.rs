/*! Preference store implementations. */

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::PreferenceStore;
use crate::types::{AtsenseError, AtsenseResult};

/// In-memory store. Preferences live as long as the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
  values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl PreferenceStore for MemoryStore {
  fn get(&self, key: &str) -> AtsenseResult<Option<String>> {
    Ok(self.values.read().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> AtsenseResult<()> {
    self.values.write().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> AtsenseResult<()> {
    self.values.write().remove(key);
    Ok(())
  }
}

/// Store backed by a JSON object file (`{"key": "value", ...}`).
///
/// The file is read on every access so external edits are picked up.
/// A missing file is an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
  path: PathBuf,
  /// Serializes read-modify-write cycles.
  write_lock: Mutex<()>,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      write_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> AtsenseResult<BTreeMap<String, String>> {
    match std::fs::read_to_string(&self.path) {
      Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
      Ok(text) => Ok(serde_json::from_str(&text)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
      Err(e) => Err(e.into()),
    }
  }

  fn save(&self, values: &BTreeMap<String, String>) -> AtsenseResult<()> {
    let text = serde_json::to_string_pretty(values)?;
    std::fs::write(&self.path, text)?;
    Ok(())
  }
}

impl PreferenceStore for JsonFileStore {
  fn get(&self, key: &str) -> AtsenseResult<Option<String>> {
    Ok(self.load()?.remove(key))
  }

  fn set(&self, key: &str, value: &str) -> AtsenseResult<()> {
    let _guard = self.write_lock.lock();
    let mut values = self.load()?;
    values.insert(key.to_string(), value.to_string());
    self.save(&values)
  }

  fn remove(&self, key: &str) -> AtsenseResult<()> {
    let _guard = self.write_lock.lock();
    let mut values = self.load()?;
    if values.remove(key).is_some() {
      self.save(&values)?;
    }
    Ok(())
  }
}

/// Store whose backend is never available (private browsing, blocked storage).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
  fn get(&self, _key: &str) -> AtsenseResult<Option<String>> {
    Err(AtsenseError::StorageUnavailable("storage disabled".into()))
  }

  fn set(&self, _key: &str, _value: &str) -> AtsenseResult<()> {
    Err(AtsenseError::StorageUnavailable("storage disabled".into()))
  }

  fn remove(&self, _key: &str) -> AtsenseResult<()> {
    Err(AtsenseError::StorageUnavailable("storage disabled".into()))
  }
}
