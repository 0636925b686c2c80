//! High-level store operations used by CLI commands.
//!
//! `SecretStore` wraps a `DocumentStore` backend and the crypto layer so
//! that the rest of the application works with calls like
//! `store.add_secret(&session, "api_key", "...", &credential)`.
//!
//! Every mutating operation loads the document, applies the change in
//! memory, and saves the whole document only once the change is complete.

use std::collections::BTreeMap;
use std::io::Write;

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use super::backend::DocumentStore;
use super::credential::{self, Credential};
use super::document::{validate_secret_name, Document};
use super::session::Session;
use crate::crypto::{derive_password_key, envelope, generate_salt, FileKey};
use crate::errors::{KeepSafeError, Result};

/// Decrypted secrets keyed by name, zeroized on drop.
pub type SecretMap = BTreeMap<String, Zeroizing<String>>;

/// The main store handle.  Build one over any `DocumentStore`, then
/// `initialize` or `unlock` it to obtain a `Session`.
pub struct SecretStore<B: DocumentStore> {
    backend: B,
}

impl<B: DocumentStore> SecretStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying persistence backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, bypassing all store checks.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Returns `true` if a document already exists.
    pub fn is_initialized(&self) -> bool {
        self.backend.exists()
    }

    // ------------------------------------------------------------------
    // Session setup
    // ------------------------------------------------------------------

    /// Create a new store protected by `password`, using the thread CSPRNG.
    ///
    /// Returns the session and the decryption key.  This is the only time
    /// the decryption key is handed out; callers must treat it as being as
    /// sensitive as the password.
    pub fn initialize(&mut self, password: &str) -> Result<(Session, Zeroizing<String>)> {
        self.initialize_with_rng(password, &mut rand::rng())
    }

    /// Create a new store, drawing the salt and FileKey from `rng`.
    ///
    /// An existing document is overwritten.
    pub fn initialize_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        password: &str,
        rng: &mut R,
    ) -> Result<(Session, Zeroizing<String>)> {
        if self.backend.exists() {
            tracing::warn!("overwriting existing secret store document");
        }

        // 1. Fresh salt and FileKey.
        let salt = generate_salt(rng);
        let file_key = FileKey::generate(rng);

        // 2. Wrap the FileKey under the password-derived key.
        let password_key = derive_password_key(password.as_bytes(), &salt);
        let encrypted_file_key = envelope::seal(password_key.as_bytes(), file_key.as_bytes())?;
        drop(password_key);

        // 3. Persist the empty document.
        let document = Document::new(salt, encrypted_file_key);
        self.backend.save(&document)?;

        tracing::info!("initialized secret store");
        let decryption_key = file_key.to_external();
        Ok((Session::new(file_key, salt), decryption_key))
    }

    /// Unlock the store with the master password.
    pub fn unlock(&self, password: &str) -> Result<Session> {
        let document = self.backend.load()?;
        let file_key = credential::unwrap_with_password(&document, password.as_bytes())?;
        tracing::debug!("unlocked with password");
        Ok(Session::new(file_key, document.salt))
    }

    /// Unlock the store with the decryption key alone.
    ///
    /// The key is checked against the sealed entries of the document, so
    /// a store with no secrets yet cannot be unlocked this way: the result
    /// is `Precondition`, whether or not the key is the right one.
    pub fn unlock_with_key(&self, decryption_key: &str) -> Result<Session> {
        let document = self.backend.load()?;
        let file_key = credential::verify_bearer_key(&document, decryption_key)?;
        tracing::debug!("unlocked with decryption key");
        Ok(Session::new(file_key, document.salt))
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Seal `value` under the FileKey and store it as `name`.
    ///
    /// An existing secret with the same name is replaced.
    pub fn add_secret(
        &mut self,
        session: &Session,
        name: &str,
        value: &str,
        credential: &Credential,
    ) -> Result<()> {
        validate_secret_name(name)?;
        let (mut document, file_key) = self.authorize(session, credential)?;

        let sealed = envelope::seal(file_key.as_bytes(), value.as_bytes())?;
        let replaced = document.secrets.insert(name.to_string(), sealed).is_some();

        self.backend.save(&document)?;
        tracing::debug!(name, replaced, "stored secret");
        Ok(())
    }

    /// Decrypt and return the value of `name`.
    pub fn get_secret(
        &self,
        session: &Session,
        name: &str,
        credential: &Credential,
    ) -> Result<Zeroizing<String>> {
        let (document, file_key) = self.authorize(session, credential)?;

        let sealed = document
            .secrets
            .get(name)
            .ok_or_else(|| KeepSafeError::SecretNotFound(name.to_string()))?;

        open_value(&file_key, sealed)
    }

    /// Remove `name` from the store.
    pub fn remove_secret(
        &mut self,
        session: &Session,
        name: &str,
        credential: &Credential,
    ) -> Result<()> {
        let (mut document, _file_key) = self.authorize(session, credential)?;

        if document.secrets.remove(name).is_none() {
            return Err(KeepSafeError::SecretNotFound(name.to_string()));
        }

        self.backend.save(&document)?;
        tracing::debug!(name, "removed secret");
        Ok(())
    }

    /// Decrypt every secret with the session's FileKey.
    pub fn decrypt_all(&self, session: &Session) -> Result<SecretMap> {
        let document = self.backend.load()?;
        session.ensure_matches(&document)?;
        decrypt_document(&document, session.file_key())
    }

    /// Unlock with `password` and write every secret to `sink` as one
    /// `name=value` line.  Values are written verbatim, without quoting or
    /// escaping.
    ///
    /// Returns the number of lines written.
    pub fn export_all<W: Write>(&self, password: &str, sink: &mut W) -> Result<usize> {
        let session = self.unlock(password)?;
        let secrets = self.decrypt_all(&session)?;
        let count = write_env_lines(&secrets, sink)?;
        tracing::debug!(count, "exported secrets");
        Ok(count)
    }

    /// Decrypt every secret using only the decryption key.
    ///
    /// Independent of any session: the document is loaded fresh and the
    /// password is never needed.  A key that does not open the first entry
    /// is an `InvalidCredential`; a later entry that fails to open has been
    /// tampered with and is an `AuthenticationFailed`.
    ///
    /// An empty store has nothing to check the key against, so any
    /// well-formed key reads the (empty) map.  Unlike `unlock_with_key`
    /// this cannot write, so nothing is ever sealed under an unverified key.
    pub fn access_read_only(&self, decryption_key: &str) -> Result<SecretMap> {
        let document = self.backend.load()?;

        let file_key = if document.secrets.is_empty() {
            FileKey::from_external(decryption_key)?
        } else {
            credential::verify_bearer_key(&document, decryption_key)?
        };

        tracing::debug!("read-only access with decryption key");
        decrypt_document(&document, &file_key)
    }

    /// Names of all stored secrets, sorted.  Nothing is decrypted.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let document = self.backend.load()?;
        Ok(document.secrets.into_keys().collect())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Load the document and check the session and credential against it.
    fn authorize(&self, session: &Session, credential: &Credential) -> Result<(Document, FileKey)> {
        let document = self.backend.load()?;
        session.ensure_matches(&document)?;
        let file_key = credential::resolve_file_key(&document, credential, session)?;
        Ok((document, file_key))
    }
}

/// Write `secrets` to `sink` as `name=value` lines, values verbatim.
pub fn write_env_lines<W: Write>(secrets: &SecretMap, sink: &mut W) -> Result<usize> {
    for (name, value) in secrets {
        writeln!(sink, "{name}={}", value.as_str())?;
    }
    sink.flush()?;
    Ok(secrets.len())
}

fn decrypt_document(document: &Document, file_key: &FileKey) -> Result<SecretMap> {
    document
        .secrets
        .iter()
        .map(|(name, sealed)| open_value(file_key, sealed).map(|value| (name.clone(), value)))
        .collect()
}

/// Open a sealed value and convert it to a string.
fn open_value(file_key: &FileKey, sealed: &str) -> Result<Zeroizing<String>> {
    let plaintext = envelope::open(file_key.as_bytes(), sealed)?;

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        KeepSafeError::InvalidDocument("secret value is not valid UTF-8".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;

    const PASSWORD: &str = "correct horse battery";

    fn initialized() -> (SecretStore<MemoryDocumentStore>, Session, Zeroizing<String>) {
        let mut store = SecretStore::new(MemoryDocumentStore::new());
        let (session, key) = store.initialize(PASSWORD).unwrap();
        (store, session, key)
    }

    #[test]
    fn add_rejects_invalid_name_before_saving() {
        let (mut store, session, _) = initialized();
        let before = store.backend().document().cloned();

        let result = store.add_secret(&session, "a=b", "v", &Credential::password(PASSWORD));
        assert!(matches!(result, Err(KeepSafeError::InvalidSecretName(_))));
        assert_eq!(store.backend().document().cloned(), before);
    }

    #[test]
    fn failed_credential_leaves_document_untouched() {
        let (mut store, session, _) = initialized();
        let before = store.backend().document().cloned();

        let result = store.add_secret(&session, "k", "v", &Credential::password("wrong"));
        assert!(matches!(result, Err(KeepSafeError::InvalidCredential)));
        assert_eq!(store.backend().document().cloned(), before);
    }

    #[test]
    fn upsert_replaces_value() {
        let (mut store, session, _) = initialized();
        let cred = Credential::password(PASSWORD);

        store.add_secret(&session, "k", "one", &cred).unwrap();
        store.add_secret(&session, "k", "two", &cred).unwrap();

        assert_eq!(store.list_names().unwrap(), vec!["k".to_string()]);
        assert_eq!(store.get_secret(&session, "k", &cred).unwrap().as_str(), "two");
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let (mut store, session, key) = initialized();
        let cred = Credential::RawKey(key);

        store.add_secret(&session, "gone", "bye", &cred).unwrap();
        store.remove_secret(&session, "gone", &cred).unwrap();

        assert!(matches!(
            store.get_secret(&session, "gone", &cred),
            Err(KeepSafeError::SecretNotFound(_))
        ));
        assert!(matches!(
            store.remove_secret(&session, "gone", &cred),
            Err(KeepSafeError::SecretNotFound(_))
        ));
    }

    #[test]
    fn access_read_only_on_empty_store_is_empty() {
        let (store, _, key) = initialized();
        assert!(store.access_read_only(&key).unwrap().is_empty());
    }

    #[test]
    fn access_read_only_rejects_malformed_key_on_empty_store() {
        let (store, _, _) = initialized();
        assert!(matches!(
            store.access_read_only("definitely-not-a-key"),
            Err(KeepSafeError::InvalidCredential)
        ));
    }
}
