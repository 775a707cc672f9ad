use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{MnemoVaultError, Result};
use crate::storage::{FileStore, KeyValueStore};
use crate::vault::layout::{
    StorageLayout, DEFAULT_CIPHERTEXT_ID, DEFAULT_KEY_ID, DEFAULT_NONCE_ID,
};

/// Where the vault's entries are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON file inside the vault directory.
    File,
    /// OS keyring (needs the `keyring-store` feature).
    Keyring,
}

/// Project-level configuration, loaded from `.mnemovault.toml`.
///
/// Every field has a sensible default so MnemoVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the store and audit log.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the JSON store inside `vault_dir`.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Storage backend (default: file).
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Service name used for keyring entries.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Identifier of the serialized key.
    #[serde(default = "default_key_id")]
    pub key_id: String,

    /// Identifier of the encrypted API key.
    #[serde(default = "default_ciphertext_id")]
    pub ciphertext_id: String,

    /// Identifier of the nonce.
    #[serde(default = "default_nonce_id")]
    pub nonce_id: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".mnemovault".to_string()
}

fn default_store_file() -> String {
    "store.json".to_string()
}

fn default_backend() -> Backend {
    Backend::File
}

fn default_keyring_service() -> String {
    "mnemovault".to_string()
}

fn default_key_id() -> String {
    DEFAULT_KEY_ID.to_string()
}

fn default_ciphertext_id() -> String {
    DEFAULT_CIPHERTEXT_ID.to_string()
}

fn default_nonce_id() -> String {
    DEFAULT_NONCE_ID.to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            store_file: default_store_file(),
            backend: default_backend(),
            keyring_service: default_keyring_service(),
            key_id: default_key_id(),
            ciphertext_id: default_ciphertext_id(),
            nonce_id: default_nonce_id(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".mnemovault.toml";

    /// Load settings from `<project_dir>/.mnemovault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            MnemoVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Full path of the vault directory.
    pub fn vault_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    /// Full path of the JSON store file.
    ///
    /// Example: `project_dir/.mnemovault/store.json`
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        self.vault_dir_path(project_dir).join(&self.store_file)
    }

    /// The storage identifiers, checked for collisions.
    pub fn layout(&self) -> Result<StorageLayout> {
        let layout = StorageLayout {
            key_id: self.key_id.clone(),
            ciphertext_id: self.ciphertext_id.clone(),
            nonce_id: self.nonce_id.clone(),
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Open the configured backend.
    pub fn open_store(&self, project_dir: &Path) -> Result<Box<dyn KeyValueStore>> {
        match self.backend {
            Backend::File => Ok(Box::new(FileStore::open(&self.store_path(project_dir))?)),
            #[cfg(feature = "keyring-store")]
            Backend::Keyring => Ok(Box::new(crate::storage::KeyringStore::new(
                &self.keyring_service,
            ))),
            #[cfg(not(feature = "keyring-store"))]
            Backend::Keyring => Err(MnemoVaultError::ConfigError(
                "backend = \"keyring\" requires building with --features keyring-store".into(),
            )),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".mnemovault");
        assert_eq!(s.store_file, "store.json");
        assert_eq!(s.backend, Backend::File);
        assert_eq!(s.key_id, "crypto-key");
        assert_eq!(s.ciphertext_id, "encrypted-api-key");
        assert_eq!(s.nonce_id, "encryption-iv");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".mnemovault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
store_file = "keys.json"
backend = "keyring"
keyring_service = "vocab-app"
key_id = "k"
ciphertext_id = "c"
nonce_id = "n"
"#;
        fs::write(tmp.path().join(".mnemovault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(settings.store_file, "keys.json");
        assert_eq!(settings.backend, Backend::Keyring);
        assert_eq!(settings.keyring_service, "vocab-app");
        assert_eq!(settings.layout().unwrap().nonce_id, "n");
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mnemovault.toml"), "vault_dir = \"v\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "v");
        // Rest should be defaults
        assert_eq!(settings.store_file, "store.json");
        assert_eq!(settings.layout().unwrap(), StorageLayout::default());
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mnemovault.toml"), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_errors_on_unknown_backend() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mnemovault.toml"), "backend = \"s3\"\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn layout_rejects_colliding_ids() {
        let s = Settings {
            nonce_id: "crypto-key".into(),
            ..Settings::default()
        };
        assert!(s.layout().is_err());
    }

    #[test]
    fn store_path_builds_correct_path() {
        let s = Settings::default();
        let project = Path::new("/home/user/vocab");
        assert_eq!(
            s.store_path(project),
            PathBuf::from("/home/user/vocab/.mnemovault/store.json")
        );
    }

    #[test]
    fn open_store_file_backend_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let store = Settings::default().open_store(tmp.path()).unwrap();
        assert_eq!(store.get("crypto-key").unwrap(), None);
    }
}
