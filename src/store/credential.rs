//! Credentials and the checks that turn them into a FileKey.
//!
//! Every failure here is the same `InvalidCredential` value, whichever
//! variant was presented and however close it came to matching.

use std::fmt;

use zeroize::Zeroizing;

use super::document::Document;
use super::session::Session;
use crate::crypto::{derive_password_key, envelope, FileKey};
use crate::errors::{KeepSafeError, Result};

/// A presented credential.
pub enum Credential {
    /// The master password.
    Password(Zeroizing<String>),
    /// The external encoding of the FileKey (the decryption key).
    RawKey(Zeroizing<String>),
}

impl Credential {
    pub fn password(password: impl Into<String>) -> Self {
        Self::Password(Zeroizing::new(password.into()))
    }

    pub fn raw_key(decryption_key: impl Into<String>) -> Self {
        Self::RawKey(Zeroizing::new(decryption_key.into()))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Password(_) => "password",
            Self::RawKey(_) => "decryption-key",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Credential::Password([REDACTED])"),
            Self::RawKey(_) => f.write_str("Credential::RawKey([REDACTED])"),
        }
    }
}

/// Unwrap the document's FileKey with the master password.
pub fn unwrap_with_password(document: &Document, password: &[u8]) -> Result<FileKey> {
    let password_key = derive_password_key(password, &document.salt);
    let raw = Zeroizing::new(
        envelope::open(password_key.as_bytes(), &document.encrypted_file_key)
            .map_err(|_| KeepSafeError::InvalidCredential)?,
    );
    FileKey::from_slice(&raw)
}

/// Resolve `credential` to the FileKey of an unlocked session.
///
/// - `Password`: re-derive the password key from the document's salt and
///   unwrap the stored FileKey.
/// - `RawKey`: decode the presented decryption key.
///
/// Either way the result must equal the session's FileKey (constant-time).
pub fn resolve_file_key(
    document: &Document,
    credential: &Credential,
    session: &Session,
) -> Result<FileKey> {
    let candidate = match credential {
        Credential::Password(password) => unwrap_with_password(document, password.as_bytes())?,
        Credential::RawKey(encoded) => FileKey::from_external(encoded)?,
    };

    if candidate.ct_eq(session.file_key()) {
        tracing::debug!(kind = credential.kind(), "credential accepted");
        Ok(candidate)
    } else {
        Err(KeepSafeError::InvalidCredential)
    }
}

/// Verify a decryption key against a freshly loaded document.
///
/// The key must open the first sealed entry.  A document without entries
/// gives the key nothing to be checked against, so even the correct key is
/// refused with `Precondition` until the password has sealed a first secret.
/// A malformed or non-matching key is always `InvalidCredential`.
pub fn verify_bearer_key(document: &Document, decryption_key: &str) -> Result<FileKey> {
    let file_key = FileKey::from_external(decryption_key)?;
    let first = document.secrets.values().next().ok_or_else(|| {
        KeepSafeError::Precondition(
            "store has no sealed entries to verify the decryption key against".into(),
        )
    })?;

    let _plaintext = Zeroizing::new(
        envelope::open(file_key.as_bytes(), first).map_err(|_| KeepSafeError::InvalidCredential)?,
    );
    Ok(file_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{seal, SALT_LEN};

    const PASSWORD: &str = "hunter2hunter2";

    /// Build a document whose FileKey is wrapped under PASSWORD.
    fn fixture() -> (Document, Session, FileKey) {
        let salt = [0x5Au8; SALT_LEN];
        let file_key = FileKey::from_slice(&[0x77u8; 32]).unwrap();
        let password_key = derive_password_key(PASSWORD.as_bytes(), &salt);
        let wrapped = seal(password_key.as_bytes(), file_key.as_bytes()).unwrap();
        let mut document = Document::new(salt, wrapped);
        document
            .secrets
            .insert("api_key".into(), seal(file_key.as_bytes(), b"k1").unwrap());
        let session = Session::new(file_key.clone(), salt);
        (document, session, file_key)
    }

    #[test]
    fn password_resolves_to_session_key() {
        let (document, session, file_key) = fixture();
        let resolved =
            resolve_file_key(&document, &Credential::password(PASSWORD), &session).unwrap();
        assert!(resolved.ct_eq(&file_key));
    }

    #[test]
    fn raw_key_resolves_to_session_key() {
        let (document, session, file_key) = fixture();
        let credential = Credential::RawKey(file_key.to_external());
        let resolved = resolve_file_key(&document, &credential, &session).unwrap();
        assert!(resolved.ct_eq(&file_key));
    }

    #[test]
    fn wrong_password_is_invalid_credential() {
        let (document, session, _) = fixture();
        let result = resolve_file_key(&document, &Credential::password("nope"), &session);
        assert!(matches!(result, Err(KeepSafeError::InvalidCredential)));
    }

    #[test]
    fn foreign_raw_key_is_invalid_credential() {
        let (document, session, _) = fixture();
        let other = FileKey::from_slice(&[0x01u8; 32]).unwrap();
        let result = resolve_file_key(&document, &Credential::RawKey(other.to_external()), &session);
        assert!(matches!(result, Err(KeepSafeError::InvalidCredential)));
    }

    #[test]
    fn password_as_raw_key_is_invalid_credential() {
        let (document, session, _) = fixture();
        let result = resolve_file_key(&document, &Credential::raw_key(PASSWORD), &session);
        assert!(matches!(result, Err(KeepSafeError::InvalidCredential)));
    }

    #[test]
    fn bearer_key_verifies_against_sealed_entry() {
        let (document, _, file_key) = fixture();
        let verified = verify_bearer_key(&document, &file_key.to_external()).unwrap();
        assert!(verified.ct_eq(&file_key));

        let other = FileKey::from_slice(&[0x02u8; 32]).unwrap();
        assert!(matches!(
            verify_bearer_key(&document, &other.to_external()),
            Err(KeepSafeError::InvalidCredential)
        ));
    }

    #[test]
    fn bearer_key_cannot_verify_empty_document() {
        let (mut document, _, file_key) = fixture();
        document.secrets.clear();
        assert!(matches!(
            verify_bearer_key(&document, &file_key.to_external()),
            Err(KeepSafeError::Precondition(_))
        ));
    }

    #[test]
    fn malformed_key_on_empty_document_is_invalid() {
        let (mut document, _, _) = fixture();
        document.secrets.clear();
        assert!(matches!(
            verify_bearer_key(&document, "not-a-key"),
            Err(KeepSafeError::InvalidCredential)
        ));
    }

    #[test]
    fn debug_hides_credential_text() {
        let shown = format!("{:?}", Credential::password(PASSWORD));
        assert!(!shown.contains(PASSWORD));
    }
}
