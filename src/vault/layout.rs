//! Fixed storage identifiers for the vault's three entries.

use serde::{Deserialize, Serialize};

use crate::errors::{MnemoVaultError, Result};

/// Default identifier for the serialized key.
pub const DEFAULT_KEY_ID: &str = "crypto-key";

/// Default identifier for the base64 ciphertext.
pub const DEFAULT_CIPHERTEXT_ID: &str = "encrypted-api-key";

/// Default identifier for the base64 nonce.
pub const DEFAULT_NONCE_ID: &str = "encryption-iv";

/// Where the vault keeps its key material, ciphertext, and nonce.
///
/// The ciphertext and nonce are only correlated through these names, so
/// all three must be distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    pub key_id: String,
    pub ciphertext_id: String,
    pub nonce_id: String,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            key_id: DEFAULT_KEY_ID.to_string(),
            ciphertext_id: DEFAULT_CIPHERTEXT_ID.to_string(),
            nonce_id: DEFAULT_NONCE_ID.to_string(),
        }
    }
}

impl StorageLayout {
    /// Reject empty or colliding identifiers.
    pub fn validate(&self) -> Result<()> {
        let ids = [
            ("key_id", &self.key_id),
            ("ciphertext_id", &self.ciphertext_id),
            ("nonce_id", &self.nonce_id),
        ];

        for (field, id) in ids {
            if id.trim().is_empty() {
                return Err(MnemoVaultError::ConfigError(format!(
                    "{field} cannot be empty"
                )));
            }
        }

        if self.key_id == self.ciphertext_id
            || self.key_id == self.nonce_id
            || self.ciphertext_id == self.nonce_id
        {
            return Err(MnemoVaultError::ConfigError(
                "key_id, ciphertext_id and nonce_id must all differ".into(),
            ));
        }

        Ok(())
    }
}
