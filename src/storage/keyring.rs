//! OS keyring `KeyValueStore`.
//!
//! Each identifier becomes one credential in the operating system's
//! secure store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! The values are already ciphertext or key material; the keyring only
//! adds a second layer of at-rest protection.
//!
//! Known limit: the keyring has no multi-entry transaction, so batches use
//! the default one-by-one `set_many` / `remove_many`.  If a save fails
//! after the ciphertext is written, the new ciphertext sits next to the
//! old nonce and the next load discards the record.

use super::KeyValueStore;
use crate::errors::{MnemoVaultError, Result};

/// Default service name used in the OS keyring.
pub const SERVICE_NAME: &str = "mnemovault";

/// A store that keeps every identifier in the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, id: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, id).map_err(|e| {
            MnemoVaultError::KeyringError(format!("failed to create keyring entry: {e}"))
        })
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, id: &str) -> Result<Option<String>> {
        match self.entry(id)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(MnemoVaultError::KeyringError(format!(
                "failed to read '{id}' from keyring: {e}"
            ))),
        }
    }

    fn set(&mut self, id: &str, value: &str) -> Result<()> {
        self.entry(id)?.set_password(value).map_err(|e| {
            MnemoVaultError::KeyringError(format!("failed to store '{id}' in keyring: {e}"))
        })
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        match self.entry(id)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already gone, that's fine.
            Err(e) => Err(MnemoVaultError::KeyringError(format!(
                "failed to delete '{id}' from keyring: {e}"
            ))),
        }
    }
}
