//! Key material held in memory.
//!
//! - `PasswordKey`: the PBKDF2 output, used only to wrap/unwrap the FileKey.
//! - `FileKey`: the random root key that seals every secret value.  Its
//!   external encoding is the "decryption key" handed to the user.
//!
//! Both types zero their bytes on drop and never print them in `Debug`.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{KeepSafeError, Result};

/// Length of every symmetric key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// The key derived from the master password and the document salt.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct PasswordKey {
    bytes: [u8; KEY_LEN],
}

impl PasswordKey {
    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; KEY_LEN],
        }
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.bytes
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for PasswordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordKey([REDACTED])")
    }
}

/// The randomly generated root key of a store.
///
/// Generated once by `initialize` and never rotated.  Whoever holds its
/// external encoding can read and write every secret in the store.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct FileKey {
    bytes: [u8; KEY_LEN],
}

impl FileKey {
    /// Generate a fresh FileKey from a cryptographically secure RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        let key = Self { bytes };
        bytes.zeroize();
        key
    }

    /// Rebuild a FileKey from raw bytes (e.g. after unwrapping).
    ///
    /// Anything other than exactly 32 bytes is rejected as an invalid
    /// credential, since the bytes always come from a presented secret.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        if raw.len() != KEY_LEN {
            return Err(KeepSafeError::InvalidCredential);
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(raw);
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    /// Decode the external (URL-safe base64) encoding of a FileKey.
    pub fn from_external(encoded: &str) -> Result<Self> {
        let raw = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim())
                .map_err(|_| KeepSafeError::InvalidCredential)?,
        );
        Self::from_slice(&raw)
    }

    /// The external encoding shown to the user as the decryption key.
    pub fn to_external(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.bytes))
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Constant-time equality check.
    pub fn ct_eq(&self, other: &FileKey) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileKey([REDACTED])")
    }
}
