//! Cryptographic primitives for MnemoVault.
//!
//! This module provides:
//! - The `SymmetricCipher` seam and its AES-256-GCM implementation (`encryption`)
//! - The zeroizing `VaultKey` and its JSON Web Key form (`keys`)

pub mod encryption;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{Aes256GcmCipher, SymmetricCipher, VaultKey};
pub use encryption::{Aes256GcmCipher, SymmetricCipher, NONCE_LEN, TAG_LEN};
pub use keys::{export_jwk, fingerprint, import_jwk, VaultKey, KEY_LEN};
