//! The unlocked-store capability.

use std::fmt;

use super::document::Document;
use crate::crypto::{FileKey, SALT_LEN};
use crate::errors::{KeepSafeError, Result};

/// Proof that a store has been unlocked.
///
/// Produced by `SecretStore::initialize`, `unlock` and `unlock_with_key`,
/// and required by every operation that touches secret values.  Holds the
/// FileKey (zeroized when the session is dropped) and the salt of the
/// document it was opened against.  The master password is not retained.
pub struct Session {
    file_key: FileKey,
    salt: [u8; SALT_LEN],
}

impl Session {
    pub(crate) fn new(file_key: FileKey, salt: [u8; SALT_LEN]) -> Self {
        Self { file_key, salt }
    }

    pub(crate) fn file_key(&self) -> &FileKey {
        &self.file_key
    }

    /// Check that `document` is the one this session was opened against.
    ///
    /// A re-initialized store has a new salt and a new FileKey, so a session
    /// from before the re-initialization must unlock again.
    pub(crate) fn ensure_matches(&self, document: &Document) -> Result<()> {
        if self.salt == document.salt {
            Ok(())
        } else {
            Err(KeepSafeError::Precondition(
                "the store was re-initialized since this session was unlocked".into(),
            ))
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("file_key", &self.file_key)
            .finish_non_exhaustive()
    }
}
