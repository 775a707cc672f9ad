//! Persistent key-value storage backing the vault.
//!
//! The vault only needs string values under string identifiers, so every
//! backend implements the small [`KeyValueStore`] trait:
//! - `MemoryStore`: in-process map, used by tests and embedders (`memory`)
//! - `FileStore`: JSON file written atomically (`file`)
//! - `KeyringStore`: one OS keyring entry per identifier (`keyring`,
//!   behind the `keyring-store` feature)

pub mod file;
pub mod memory;

#[cfg(feature = "keyring-store")]
pub mod keyring;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(feature = "keyring-store")]
pub use self::keyring::KeyringStore;

use crate::errors::Result;

/// A persistent string → string map.
///
/// `get` on a missing identifier is `Ok(None)`, and `remove` on a missing
/// identifier is a no-op.  Errors mean the storage itself is unusable.
pub trait KeyValueStore {
    fn get(&self, id: &str) -> Result<Option<String>>;

    fn set(&mut self, id: &str, value: &str) -> Result<()>;

    fn remove(&mut self, id: &str) -> Result<()>;

    /// Write several entries.  Backends that can commit them together
    /// should override this.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (id, value) in entries {
            self.set(id, value)?;
        }
        Ok(())
    }

    /// Remove several entries.  Backends that can commit them together
    /// should override this.
    fn remove_many(&mut self, ids: &[&str]) -> Result<()> {
        for id in ids {
            self.remove(id)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, id: &str) -> Result<Option<String>> {
        (**self).get(id)
    }

    fn set(&mut self, id: &str, value: &str) -> Result<()> {
        (**self).set(id, value)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        (**self).remove(id)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }

    fn remove_many(&mut self, ids: &[&str]) -> Result<()> {
        (**self).remove_many(ids)
    }
}
