//! AES-256-GCM envelopes encoded as text.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce.  The
//! envelope is self-describing: everything needed to open it except the
//! key travels with it.
//!
//! Layout of the byte buffer before base64 encoding:
//!   [ version: 1 byte | 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! The version byte is fed to GCM as associated data, so it is covered by
//! the auth tag along with the ciphertext.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use super::keys::KEY_LEN;
use crate::errors::{KeepSafeError, Result};

/// Envelope format version.
pub const ENVELOPE_VERSION: u8 = 0x01;

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM auth tag in bytes.
const TAG_LEN: usize = 16;

/// Seal `plaintext` under a 32-byte `key` and return the envelope string.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| KeepSafeError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &[ENVELOPE_VERSION],
            },
        )
        .map_err(|e| KeepSafeError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    output.push(ENVELOPE_VERSION);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(URL_SAFE.encode(output))
}

/// Open an envelope produced by `seal`.
///
/// Fails closed: every malformed, truncated, foreign-version, wrong-key or
/// modified envelope yields `AuthenticationFailed` and no plaintext.
pub fn open(key: &[u8; KEY_LEN], envelope: &str) -> Result<Vec<u8>> {
    let raw = URL_SAFE
        .decode(envelope)
        .map_err(|_| KeepSafeError::AuthenticationFailed)?;

    if raw.len() < 1 + NONCE_LEN + TAG_LEN || raw[0] != ENVELOPE_VERSION {
        return Err(KeepSafeError::AuthenticationFailed);
    }

    let (nonce_bytes, ciphertext) = raw[1..].split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| KeepSafeError::AuthenticationFailed)?;

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: &[ENVELOPE_VERSION],
            },
        )
        .map_err(|_| KeepSafeError::AuthenticationFailed)
}
