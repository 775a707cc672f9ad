//! Vault module — the encrypted API-key store.
//!
//! This module provides:
//! - `CredentialVault`, which encrypts one secret into a key-value store (`credential`)
//! - `StorageLayout`, the identifiers it uses (`layout`)
//! - Pre-save validation hooks (`validate`)

pub mod credential;
pub mod layout;
pub mod validate;

// Re-export the most commonly used items.
pub use credential::{CredentialVault, DiscardReason, Lookup, VaultStatus};
pub use layout::StorageLayout;
pub use validate::{BlankCheck, KeyValidator, Validation};
