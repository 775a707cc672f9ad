//! JSON-file `KeyValueStore`.
//!
//! The whole map is one JSON object:
//!
//! ```text
//! {"crypto-key":"{...jwk...}","encrypted-api-key":"<base64>","encryption-iv":"<base64>"}
//! ```
//!
//! Every mutation rewrites the file via temp file + rename, so readers
//! never see a half-written store.  A batch (`set_many` / `remove_many`)
//! is a single rewrite, which keeps the ciphertext and nonce in step.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::errors::{MnemoVaultError, Result};

/// A store persisted as a JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, or start an empty one if the file does
    /// not exist yet.  Nothing is written until the first mutation.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let data = fs::read(path)?;
            serde_json::from_slice(&data).map_err(|e| {
                MnemoVaultError::Storage(format!("{} is not a valid store: {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the map, persist it, then keep it.
    ///
    /// If the write fails the in-memory map is left untouched.
    fn commit<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut next = self.entries.clone();
        change(&mut next);
        if next == self.entries && self.path.exists() {
            return Ok(());
        }

        write_atomic(&self.path, &next)?;
        self.entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.entries.get(id).cloned())
    }

    fn set(&mut self, id: &str, value: &str) -> Result<()> {
        self.commit(|map| {
            map.insert(id.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        if !self.entries.contains_key(id) {
            return Ok(());
        }
        self.commit(|map| {
            map.remove(id);
        })
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        self.commit(|map| {
            for (id, value) in entries {
                map.insert((*id).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_many(&mut self, ids: &[&str]) -> Result<()> {
        if !ids.iter().any(|id| self.entries.contains_key(*id)) {
            return Ok(());
        }
        self.commit(|map| {
            for id in ids {
                map.remove(*id);
            }
        })
    }
}

/// Serialize `entries` and swap them into place at `path`.
///
/// The temp file lives in the same directory so the rename stays on one
/// filesystem.  On Unix it is created owner-only.
fn write_atomic(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let data = serde_json::to_vec_pretty(entries)
        .map_err(|e| MnemoVaultError::SerializationError(format!("store: {e}")))?;

    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    // A leftover temp file from a crashed write may carry looser
    // permissions; start from a fresh one.
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)
            .map_err(|e| MnemoVaultError::Storage(format!("failed to remove stale temp file: {e}")))?;
    }

    // Owner-only from creation.
    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&tmp_path)
            .map_err(|e| MnemoVaultError::Storage(format!("failed to create temp file: {e}")))?
    };

    #[cfg(not(unix))]
    let mut file = fs::File::create(&tmp_path)
        .map_err(|e| MnemoVaultError::Storage(format!("failed to create temp file: {e}")))?;

    file.write_all(&data)
        .and_then(|()| file.sync_all())
        .map_err(|e| MnemoVaultError::Storage(format!("failed to write store: {e}")))?;
    drop(file);

    fs::rename(&tmp_path, path)
        .map_err(|e| MnemoVaultError::Storage(format!("failed to replace store: {e}")))?;

    Ok(())
}
