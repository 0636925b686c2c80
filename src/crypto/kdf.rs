//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The work factor is fixed: the document does not record KDF parameters,
//! so changing `ITERATIONS` would make every existing store unopenable.

use pbkdf2::pbkdf2_hmac;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

use super::keys::{PasswordKey, KEY_LEN};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count.
pub const ITERATIONS: u32 = 100_000;

/// Derive the 32-byte password key from a password and salt.
///
/// The same password + salt always produce the same key, which is what
/// lets `unlock` recover the key that wrapped the FileKey at init time.
pub fn derive_password_key(password: &[u8], salt: &[u8; SALT_LEN]) -> PasswordKey {
    let mut key = PasswordKey::zeroed();
    pbkdf2_hmac::<Sha256>(password, salt, ITERATIONS, key.as_mut_bytes());
    key
}

/// Generate a random 16-byte salt from `rng`.
pub fn generate_salt<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_key_has_aes256_length() {
        let key = derive_password_key(b"pw", &[7u8; SALT_LEN]);
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn matches_reference_pbkdf2_output() {
        let salt = [0x11u8; SALT_LEN];
        let mut expected = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(b"correct horse", &salt, ITERATIONS, &mut expected);

        let key = derive_password_key(b"correct horse", &salt);
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn salts_are_not_repeated() {
        let mut rng = rand::rng();
        let a = generate_salt(&mut rng);
        let b = generate_salt(&mut rng);
        assert_ne!(a, b);
    }
}
