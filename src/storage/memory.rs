//! In-memory `KeyValueStore`.

use std::collections::HashMap;

use super::KeyValueStore;
use crate::errors::Result;

/// A `HashMap`-backed store.  Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.entries.get(id).cloned())
    }

    fn set(&mut self, id: &str, value: &str) -> Result<()> {
        self.entries.insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        self.entries.remove(id);
        Ok(())
    }
}
