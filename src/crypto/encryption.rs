//! AES-256-GCM authenticated encryption behind the `SymmetricCipher` seam.
//!
//! The vault never talks to `aes-gcm` directly; it goes through
//! [`SymmetricCipher`] so another AEAD (or a test double) can be swapped
//! in.  Nonces are produced by the cipher and stored next to the
//! ciphertext by the caller; the ciphertext returned by `encrypt` already
//! carries the 16-byte authentication tag.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroize;

use super::keys::{export_jwk, import_jwk, VaultKey, KEY_LEN};
use crate::errors::{MnemoVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// A symmetric authenticated-encryption primitive.
pub trait SymmetricCipher {
    /// In-memory key handle.
    type Key;

    /// Create a brand-new random key.
    fn generate_key(&self) -> Result<Self::Key>;

    /// Serialize a key into storable text.
    fn export_key(&self, key: &Self::Key) -> Result<String>;

    /// Parse stored text back into a key handle.
    fn import_key(&self, material: &str) -> Result<Self::Key>;

    /// Produce a fresh random nonce.  Must never repeat under one key.
    fn generate_nonce(&self) -> [u8; NONCE_LEN];

    /// Encrypt and authenticate `plaintext`.
    fn encrypt(&self, key: &Self::Key, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Verify and decrypt `ciphertext`.  Any failure is `DecryptionFailed`.
    fn decrypt(&self, key: &Self::Key, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// AES-256-GCM with keys persisted as JSON Web Keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl SymmetricCipher for Aes256GcmCipher {
    type Key = VaultKey;

    fn generate_key(&self) -> Result<VaultKey> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| MnemoVaultError::EncryptionFailed(format!("key generation: {e}")))?;
        let key = VaultKey::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    fn export_key(&self, key: &VaultKey) -> Result<String> {
        export_jwk(key)
    }

    fn import_key(&self, material: &str) -> Result<VaultKey> {
        import_jwk(material)
    }

    fn generate_nonce(&self) -> [u8; NONCE_LEN] {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut out = [0u8; NONCE_LEN];
        out.copy_from_slice(&nonce);
        out
    }

    fn encrypt(&self, key: &VaultKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != NONCE_LEN {
            return Err(MnemoVaultError::EncryptionFailed(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| MnemoVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| MnemoVaultError::EncryptionFailed(format!("encryption error: {e}")))
    }

    fn decrypt(&self, key: &VaultKey, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        // `Nonce::from_slice` panics on a wrong length, so check first.
        if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
            return Err(MnemoVaultError::DecryptionFailed);
        }

        let cipher =
            Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| MnemoVaultError::DecryptionFailed)?;

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| MnemoVaultError::DecryptionFailed)
    }
}
