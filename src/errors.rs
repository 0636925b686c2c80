use thiserror::Error;

/// All errors that can occur in KeepSafe.
#[derive(Debug, Error)]
pub enum KeepSafeError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed: sealed data is corrupted or was tampered with")]
    AuthenticationFailed,

    // --- Credential errors ---
    #[error("Invalid password or decryption key")]
    InvalidCredential,

    #[error("Precondition failed: {0}")]
    Precondition(String),

    // --- Store errors ---
    #[error("Secret store not initialized: no document at {0}")]
    NotInitialized(String),

    #[error("Invalid store document: {0}")]
    InvalidDocument(String),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Invalid secret name: {0}")]
    InvalidSecretName(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for KeepSafe results.
pub type Result<T> = std::result::Result<T, KeepSafeError>;
