//! The credential vault: one encrypted secret kept in a key-value store.
//!
//! `CredentialVault` ties a [`KeyValueStore`] to a [`SymmetricCipher`] so
//! that callers only ever see plaintext going in and (maybe) plaintext
//! coming out:
//!
//! ```ignore
//! let mut vault = CredentialVault::new(FileStore::open(&path)?);
//! vault.save_secret("sk-abc123")?;
//! assert_eq!(vault.load_secret()?.as_deref().map(String::as_str), Some("sk-abc123"));
//! ```
//!
//! The key is created lazily on the first save and reused afterwards.
//! A record that cannot be decrypted is deleted and reported as absent.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use super::layout::StorageLayout;
use crate::crypto::{fingerprint, Aes256GcmCipher, SymmetricCipher};
use crate::errors::Result;
use crate::storage::KeyValueStore;

/// Why a stored record was thrown away during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Ciphertext or nonce was not valid base64.
    Undecodable,
    /// The AEAD tag did not verify (tampering, wrong key, bad nonce).
    AuthenticationFailed,
    /// Decryption succeeded but the bytes were not UTF-8.
    NotUtf8,
    /// A record exists but there is no key that could have produced it.
    MissingKey,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Undecodable => "stored values are not valid base64",
            Self::AuthenticationFailed => "authentication failed",
            Self::NotUtf8 => "decrypted value is not UTF-8",
            Self::MissingKey => "encryption key is missing",
        };
        f.write_str(text)
    }
}

/// Detailed result of reading the vault.
pub enum Lookup {
    /// The secret decrypted cleanly.
    Found(Zeroizing<String>),
    /// No record stored (first run, or after a clear).
    Empty,
    /// A record existed but was unusable and has been removed.
    Discarded(DiscardReason),
}

impl Lookup {
    /// Collapse to "secret or nothing".
    pub fn into_secret(self) -> Option<Zeroizing<String>> {
        match self {
            Self::Found(secret) => Some(secret),
            Self::Empty | Self::Discarded(_) => None,
        }
    }
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(_) => f.write_str("Found([redacted])"),
            Self::Empty => f.write_str("Empty"),
            Self::Discarded(reason) => f.debug_tuple("Discarded").field(reason).finish(),
        }
    }
}

/// Presence information that can be read without decrypting anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStatus {
    /// Fingerprint of the stored key material, if a key exists.
    pub key_fingerprint: Option<String>,
    pub has_ciphertext: bool,
    pub has_nonce: bool,
}

impl VaultStatus {
    pub fn has_key(&self) -> bool {
        self.key_fingerprint.is_some()
    }

    /// A loadable record needs both halves.
    pub fn has_record(&self) -> bool {
        self.has_ciphertext && self.has_nonce
    }
}

/// Encrypts one secret into a key-value store and reads it back.
pub struct CredentialVault<S, C = Aes256GcmCipher> {
    store: S,
    cipher: C,
    layout: StorageLayout,
}

impl<S: KeyValueStore> CredentialVault<S> {
    /// Vault over `store` using AES-256-GCM and the default identifiers.
    pub fn new(store: S) -> Self {
        Self::with_cipher(store, Aes256GcmCipher, StorageLayout::default())
    }
}

impl<S: KeyValueStore, C: SymmetricCipher> CredentialVault<S, C> {
    /// Vault with an explicit cipher and storage layout.
    pub fn with_cipher(store: S, cipher: C, layout: StorageLayout) -> Self {
        Self {
            store,
            cipher,
            layout,
        }
    }

    /// Replace the storage identifiers.
    pub fn with_layout(mut self, layout: StorageLayout) -> Self {
        self.layout = layout;
        self
    }

    // ------------------------------------------------------------------
    // Key management
    // ------------------------------------------------------------------

    /// Return the vault key, generating and persisting one if none exists.
    ///
    /// Stored material that cannot be parsed is an error.  A replacement
    /// key is never generated in that case, because it could not decrypt
    /// the record already in the store.
    pub fn obtain_key(&mut self) -> Result<C::Key> {
        if let Some(key) = self.stored_key()? {
            return Ok(key);
        }

        let key = self.cipher.generate_key()?;
        let material = Zeroizing::new(self.cipher.export_key(&key)?);
        self.store.set(&self.layout.key_id, material.as_str())?;

        info!(
            key_id = %self.layout.key_id,
            fingerprint = %fingerprint(material.as_str()),
            "generated new vault key"
        );

        Ok(key)
    }

    /// Import the stored key, if there is one.  Never creates a key.
    fn stored_key(&self) -> Result<Option<C::Key>> {
        match self.store.get(&self.layout.key_id)? {
            Some(material) => {
                let material = Zeroizing::new(material);
                self.cipher.import_key(material.as_str()).map(Some)
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Encrypt `plaintext` under a fresh nonce and store it, replacing
    /// any previous secret.
    ///
    /// Blank input is not rejected here; that is up to the caller.
    pub fn save_secret(&mut self, plaintext: &str) -> Result<()> {
        let key = self.obtain_key()?;
        let nonce = self.cipher.generate_nonce();
        let ciphertext = self.cipher.encrypt(&key, &nonce, plaintext.as_bytes())?;

        let ciphertext_b64 = BASE64.encode(&ciphertext);
        let nonce_b64 = BASE64.encode(nonce);

        self.store.set_many(&[
            (self.layout.ciphertext_id.as_str(), ciphertext_b64.as_str()),
            (self.layout.nonce_id.as_str(), nonce_b64.as_str()),
        ])?;

        debug!(
            ciphertext_id = %self.layout.ciphertext_id,
            ciphertext_len = ciphertext.len(),
            "stored encrypted secret"
        );

        Ok(())
    }

    /// Decrypt the stored secret.
    ///
    /// `Ok(None)` covers both "nothing stored" and "stored record was
    /// unusable and has been removed".  Errors are reserved for storage
    /// failures and corrupt key material.
    pub fn load_secret(&mut self) -> Result<Option<Zeroizing<String>>> {
        self.lookup().map(Lookup::into_secret)
    }

    /// Like [`load_secret`](Self::load_secret), but says why nothing came
    /// back.
    pub fn lookup(&mut self) -> Result<Lookup> {
        let ciphertext_b64 = self.store.get(&self.layout.ciphertext_id)?;
        let nonce_b64 = self.store.get(&self.layout.nonce_id)?;

        let (Some(ciphertext_b64), Some(nonce_b64)) = (ciphertext_b64, nonce_b64) else {
            return Ok(Lookup::Empty);
        };

        // Only read the key once a record exists, so a first-run load
        // leaves the store untouched.
        let Some(key) = self.stored_key()? else {
            return self.discard(DiscardReason::MissingKey);
        };

        let (Ok(ciphertext), Ok(nonce)) = (
            BASE64.decode(ciphertext_b64.as_bytes()),
            BASE64.decode(nonce_b64.as_bytes()),
        ) else {
            return self.discard(DiscardReason::Undecodable);
        };

        let plaintext = match self.cipher.decrypt(&key, &nonce, &ciphertext) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "decryption rejected stored record");
                return self.discard(DiscardReason::AuthenticationFailed);
            }
        };

        match String::from_utf8(plaintext) {
            Ok(secret) => Ok(Lookup::Found(Zeroizing::new(secret))),
            Err(e) => {
                let mut bad_bytes = e.into_bytes();
                bad_bytes.zeroize();
                self.discard(DiscardReason::NotUtf8)
            }
        }
    }

    /// Drop an unusable record so the next load starts clean.
    fn discard(&mut self, reason: DiscardReason) -> Result<Lookup> {
        self.store
            .remove_many(&[self.layout.ciphertext_id.as_str(), self.layout.nonce_id.as_str()])?;
        warn!(%reason, "discarded unreadable secret record");
        Ok(Lookup::Discarded(reason))
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Report what is stored without decrypting.
    pub fn status(&self) -> Result<VaultStatus> {
        let key_fingerprint = self
            .store
            .get(&self.layout.key_id)?
            .map(|material| fingerprint(Zeroizing::new(material).as_str()));

        Ok(VaultStatus {
            key_fingerprint,
            has_ciphertext: self.store.get(&self.layout.ciphertext_id)?.is_some(),
            has_nonce: self.store.get(&self.layout.nonce_id)?.is_some(),
        })
    }

    /// Remove the stored secret, keeping the key.
    ///
    /// Returns `true` if anything was removed.
    pub fn clear(&mut self) -> Result<bool> {
        let status = self.status()?;
        if !status.has_ciphertext && !status.has_nonce {
            return Ok(false);
        }

        self.store
            .remove_many(&[self.layout.ciphertext_id.as_str(), self.layout.nonce_id.as_str()])?;
        debug!("cleared secret record");
        Ok(true)
    }

    /// Remove the stored secret and the key.  The next save starts a new
    /// key.
    pub fn forget(&mut self) -> Result<()> {
        self.store.remove_many(&[
            self.layout.ciphertext_id.as_str(),
            self.layout.nonce_id.as_str(),
            self.layout.key_id.as_str(),
        ])?;
        info!("removed secret record and vault key");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The identifiers this vault reads and writes.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MnemoVaultError;
    use crate::storage::MemoryStore;

    fn vault() -> CredentialVault<MemoryStore> {
        CredentialVault::new(MemoryStore::new())
    }

    #[test]
    fn lookup_on_empty_store_is_empty() {
        let mut v = vault();
        assert!(matches!(v.lookup().unwrap(), Lookup::Empty));
        assert!(v.store().is_empty());
    }

    #[test]
    fn lookup_with_only_ciphertext_is_empty_and_untouched() {
        let mut v = vault();
        v.store_mut().set("encrypted-api-key", "AAAA").unwrap();
        assert!(matches!(v.lookup().unwrap(), Lookup::Empty));
        assert_eq!(v.store().len(), 1);
    }

    #[test]
    fn record_without_key_is_discarded() {
        let mut v = vault();
        v.save_secret("sk-abc123").unwrap();
        v.store_mut().remove("crypto-key").unwrap();

        let outcome = v.lookup().unwrap();
        assert!(matches!(
            outcome,
            Lookup::Discarded(DiscardReason::MissingKey)
        ));
        assert!(v.store().is_empty(), "no key must be generated on load");
    }

    #[test]
    fn bad_base64_is_discarded() {
        let mut v = vault();
        v.save_secret("sk-abc123").unwrap();
        v.store_mut().set("encryption-iv", "***").unwrap();

        assert!(matches!(
            v.lookup().unwrap(),
            Lookup::Discarded(DiscardReason::Undecodable)
        ));
        assert!(!v.status().unwrap().has_record());
    }

    #[test]
    fn corrupt_key_material_propagates() {
        let mut v = vault();
        v.save_secret("sk-abc123").unwrap();
        v.store_mut().set("crypto-key", "{broken").unwrap();

        let err = v.lookup().unwrap_err();
        assert!(matches!(err, MnemoVaultError::KeyMaterialCorrupt(_)));
        // The record is left alone so the caller can decide what to do.
        assert!(v.status().unwrap().has_record());
    }

    #[test]
    fn corrupt_key_material_blocks_save() {
        let mut v = vault();
        v.store_mut().set("crypto-key", "{broken").unwrap();
        assert!(v.save_secret("sk-abc123").is_err());
        assert_eq!(
            v.store().get("crypto-key").unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn clear_reports_whether_anything_was_removed() {
        let mut v = vault();
        assert!(!v.clear().unwrap());
        v.save_secret("sk-abc123").unwrap();
        assert!(v.clear().unwrap());
        assert!(v.status().unwrap().has_key());
        assert!(!v.status().unwrap().has_record());
    }

    #[test]
    fn forget_removes_key_too() {
        let mut v = vault();
        v.save_secret("sk-abc123").unwrap();
        v.forget().unwrap();
        assert!(v.store().is_empty());
    }

    #[test]
    fn custom_layout_is_respected() {
        let layout = StorageLayout {
            key_id: "k".into(),
            ciphertext_id: "c".into(),
            nonce_id: "n".into(),
        };
        let mut v = vault().with_layout(layout);
        v.save_secret("sk-abc123").unwrap();

        assert!(v.store().get("k").unwrap().is_some());
        assert!(v.store().get("c").unwrap().is_some());
        assert!(v.store().get("n").unwrap().is_some());
        assert!(v.store().get("crypto-key").unwrap().is_none());
    }

    #[test]
    fn discard_reasons_display_without_crypto_internals() {
        let reasons = [
            DiscardReason::Undecodable,
            DiscardReason::AuthenticationFailed,
            DiscardReason::NotUtf8,
            DiscardReason::MissingKey,
        ];
        for reason in reasons {
            let text = reason.to_string().to_lowercase();
            assert!(!text.is_empty());
            for internal in ["aead", "aes", "gcm", "tag", "error("] {
                assert!(!text.contains(internal), "{reason:?} shows '{internal}'");
            }
        }
        assert_eq!(
            DiscardReason::AuthenticationFailed.to_string(),
            "authentication failed"
        );
    }

    /// Writes entries one at a time and fails on the nonce, like a
    /// keyring that drops out halfway through a save.
    #[derive(Default)]
    struct FailOnNonce {
        inner: MemoryStore,
        armed: bool,
    }

    impl KeyValueStore for FailOnNonce {
        fn get(&self, id: &str) -> Result<Option<String>> {
            self.inner.get(id)
        }

        fn set(&mut self, id: &str, value: &str) -> Result<()> {
            if self.armed && id == "encryption-iv" {
                return Err(MnemoVaultError::KeyringError("unavailable".into()));
            }
            self.inner.set(id, value)
        }

        fn remove(&mut self, id: &str) -> Result<()> {
            self.inner.remove(id)
        }
    }

    #[test]
    fn half_written_save_is_discarded_on_next_load() {
        let mut v = CredentialVault::new(FailOnNonce::default());
        v.save_secret("sk-old").unwrap();

        v.store_mut().armed = true;
        assert!(v.save_secret("sk-new").is_err());
        v.store_mut().armed = false;

        // New ciphertext next to the old nonce never decrypts to anything.
        assert!(matches!(
            v.lookup().unwrap(),
            Lookup::Discarded(DiscardReason::AuthenticationFailed)
        ));
        assert!(!v.status().unwrap().has_record());
        assert!(v.status().unwrap().has_key());
    }
}
