use thiserror::Error;

/// All errors that can occur in MnemoVault.
#[derive(Debug, Error)]
pub enum MnemoVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Stored key material is corrupt: {0}")]
    KeyMaterialCorrupt(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),

    // --- Caller-side errors ---
    #[error("No API key stored — run `mnemovault set` to add one")]
    NoSecretStored,

    #[error("Secret is empty — enter a non-blank API key")]
    EmptySecret,

    #[error("API key was rejected: {0}")]
    ValidationFailed(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl MnemoVaultError {
    /// A short message that is safe to show to an end user.
    ///
    /// Crypto and storage failures collapse into generic, retry-capable
    /// text; the full error is only written to the debug log.
    pub fn user_message(&self) -> String {
        match self {
            Self::EncryptionFailed(_) | Self::DecryptionFailed => {
                "Could not protect the API key. Please try again.".into()
            }
            Self::KeyMaterialCorrupt(_) => {
                "The local encryption key is unreadable. Run `mnemovault clear --forget-key` and set the API key again.".into()
            }
            Self::Storage(_) | Self::KeyringError(_) | Self::Io(_) | Self::SerializationError(_) => {
                "Local storage is unavailable. Check disk space and permissions, then try again."
                    .into()
            }
            Self::AuditError(_) => "The audit log could not be read.".into(),
            Self::ConfigError(_)
            | Self::NoSecretStored
            | Self::EmptySecret
            | Self::ValidationFailed(_)
            | Self::CommandFailed(_)
            | Self::UserCancelled => self.to_string(),
        }
    }
}

/// Convenience type alias for MnemoVault results.
pub type Result<T> = std::result::Result<T, MnemoVaultError>;
