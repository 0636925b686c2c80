//! The persisted store document.
//!
//! Serialized as JSON:
//!
//! ```text
//! {
//!   "salt": "<url-safe base64 of 16 bytes>",
//!   "encrypted_file_key": "<envelope>",
//!   "secrets": { "<name>": "<envelope>", ... }
//! }
//! ```
//!
//! Names are stored in clear; values are envelopes sealed under the FileKey.

use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::SALT_LEN;
use crate::errors::{KeepSafeError, Result};

/// Maximum length of a secret name in bytes.
const MAX_NAME_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Salt for the password KDF, fixed for the life of the document.
    #[serde(serialize_with = "salt_encode", deserialize_with = "salt_decode")]
    pub salt: [u8; SALT_LEN],

    /// The FileKey sealed under the password-derived key.
    pub encrypted_file_key: String,

    /// Secret name -> envelope sealed under the FileKey.
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

impl Document {
    /// A fresh document with no secrets.
    pub fn new(salt: [u8; SALT_LEN], encrypted_file_key: String) -> Self {
        Self {
            salt,
            encrypted_file_key,
            secrets: BTreeMap::new(),
        }
    }

    /// Parse a document from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| KeepSafeError::InvalidDocument(e.to_string()))
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| KeepSafeError::SerializationError(format!("document: {e}")))
    }
}

/// Validate that a secret name can be stored and exported.
///
/// Names must be non-empty, at most 256 bytes, and free of `=`, `\n` and
/// `\r`, since each secret exports as a single `name=value` line.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(KeepSafeError::InvalidSecretName(
            "secret name cannot be empty".into(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(KeepSafeError::InvalidSecretName(format!(
            "secret name cannot exceed {MAX_NAME_LEN} bytes"
        )));
    }
    if name.contains(['=', '\n', '\r']) {
        return Err(KeepSafeError::InvalidSecretName(format!(
            "'{}' contains '=' or a line break",
            name.escape_debug()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for the base64-encoded salt
// ---------------------------------------------------------------------------

fn salt_encode<S>(salt: &[u8; SALT_LEN], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&URL_SAFE.encode(salt))
}

fn salt_decode<'de, D>(deserializer: D) -> std::result::Result<[u8; SALT_LEN], D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let bytes = URL_SAFE.decode(&s).map_err(serde::de::Error::custom)?;
    bytes.as_slice().try_into().map_err(|_| {
        serde::de::Error::custom(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            bytes.len()
        ))
    })
}
