//! The vault's symmetric key and its persisted form.
//!
//! In memory the key lives in a [`VaultKey`], which zeroes its bytes on
//! drop.  On disk (or in whatever `KeyValueStore` backs the vault) it is a
//! JSON Web Key:
//!
//! ```text
//! {"kty":"oct","alg":"A256GCM","k":"<base64url, no padding>","key_ops":["encrypt","decrypt"],"ext":true}
//! ```

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{MnemoVaultError, Result};

/// Length of the symmetric key (256 bits).
pub const KEY_LEN: usize = 32;

/// JWK key type for raw symmetric keys.
const JWK_KTY: &str = "oct";

/// JWK algorithm name for AES-256-GCM.
const JWK_ALG: &str = "A256GCM";

/// Number of digest bytes shown in a key fingerprint.
const FINGERPRINT_LEN: usize = 8;

/// A 32-byte AES-256-GCM key that wipes itself when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher instance).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey([redacted])")
    }
}

/// Serialized key material.  Only the fields the vault relies on are
/// modelled; anything else a JWK might carry is ignored on import.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct Jwk {
    kty: String,
    alg: String,
    k: String,
    #[serde(default)]
    key_ops: Vec<String>,
    #[serde(default)]
    ext: bool,
}

/// Serialize a key into its storable JWK text form.
pub fn export_jwk(key: &VaultKey) -> Result<String> {
    let jwk = Jwk {
        kty: JWK_KTY.into(),
        alg: JWK_ALG.into(),
        k: URL_SAFE_NO_PAD.encode(key.as_bytes()),
        key_ops: vec!["encrypt".into(), "decrypt".into()],
        ext: true,
    };

    serde_json::to_string(&jwk)
        .map_err(|e| MnemoVaultError::SerializationError(format!("key material: {e}")))
}

/// Parse stored JWK text back into a usable key.
///
/// Any structural problem (bad JSON, wrong key type or algorithm, missing
/// encrypt/decrypt capability, wrong length) is reported as
/// `KeyMaterialCorrupt`.
pub fn import_jwk(material: &str) -> Result<VaultKey> {
    let jwk: Jwk = serde_json::from_str(material)
        .map_err(|e| MnemoVaultError::KeyMaterialCorrupt(format!("not a JSON Web Key: {e}")))?;

    if jwk.kty != JWK_KTY {
        return Err(MnemoVaultError::KeyMaterialCorrupt(format!(
            "unsupported key type '{}'",
            jwk.kty
        )));
    }
    if jwk.alg != JWK_ALG {
        return Err(MnemoVaultError::KeyMaterialCorrupt(format!(
            "algorithm mismatch: expected {JWK_ALG}, found '{}'",
            jwk.alg
        )));
    }

    // An absent `key_ops` means unrestricted; a present one must allow both.
    if !jwk.key_ops.is_empty() {
        let allows = |op: &str| jwk.key_ops.iter().any(|o| o == op);
        if !allows("encrypt") || !allows("decrypt") {
            return Err(MnemoVaultError::KeyMaterialCorrupt(
                "key is not usable for encrypt and decrypt".into(),
            ));
        }
    }

    let raw = Zeroizing::new(
        URL_SAFE_NO_PAD
            .decode(jwk.k.as_bytes())
            .map_err(|e| MnemoVaultError::KeyMaterialCorrupt(format!("invalid key encoding: {e}")))?,
    );

    if raw.len() != KEY_LEN {
        return Err(MnemoVaultError::KeyMaterialCorrupt(format!(
            "key must be {KEY_LEN} bytes, got {}",
            raw.len()
        )));
    }

    let mut bytes = [0u8; KEY_LEN];
    bytes.copy_from_slice(&raw);
    let key = VaultKey::new(bytes);
    bytes.zeroize();

    Ok(key)
}

/// Short, non-reversible identifier for a piece of key material.
///
/// Lets `status` show whether the key changed without revealing it.
pub fn fingerprint(material: &str) -> String {
    let digest = Sha256::digest(material.as_bytes());
    digest[..FINGERPRINT_LEN]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
