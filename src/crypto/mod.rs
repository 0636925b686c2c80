//! Cryptographic primitives for KeepSafe.
//!
//! This module provides:
//! - AES-256-GCM text envelopes (`envelope`)
//! - PBKDF2-HMAC-SHA256 password key derivation (`kdf`)
//! - Zeroizing key types, including the FileKey and its external encoding (`keys`)

pub mod envelope;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_password_key, ...};
pub use envelope::{open, seal};
pub use kdf::{derive_password_key, generate_salt, ITERATIONS, SALT_LEN};
pub use keys::{FileKey, PasswordKey, KEY_LEN};
