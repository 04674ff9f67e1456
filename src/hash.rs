//! Salt, password-hash, and session-token derivation.
//!
//! Passwords are hashed with Argon2id over the account's stored salt; the
//! derivation is deterministic, so the same (salt, password) pair always
//! yields the same persisted hash. Session tokens are a SHA-256 digest of
//! the account id and the current password hash, which makes every
//! outstanding session depend on the credential it was issued against.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use tracing::error;
use uuid::Uuid;

use crate::error::AuthError;

/// Length of generated account salts, in alphanumeric characters.
///
/// Wider than the historical 7 characters this scheme shipped with;
/// Argon2id refuses salts shorter than 8 bytes.
pub const SALT_LENGTH: usize = 16;

/// Generate a fresh random alphanumeric salt from the OS entropy source.
///
/// Salts are independently random per account, not checked for global
/// uniqueness; the alphabet and length make collisions vanishingly
/// unlikely.
#[must_use]
pub fn generate_salt() -> String {
    generate_salt_with_rng(&mut OsRng)
}

pub(crate) fn generate_salt_with_rng<R: RngCore + ?Sized>(rng: &mut R) -> String {
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .take(SALT_LENGTH)
        .map(char::from)
        .collect()
}

/// Derive the stored password hash for a salt and plaintext password.
///
/// Deterministic one-way derivation: verification recomputes this with the
/// account's salt, and session tokens embed the resulting PHC string.
///
/// # Errors
/// Returns [`AuthError::Hash`] if Argon2id rejects the inputs.
pub fn derive_password_hash(salt: &str, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(salt.as_bytes()).map_err(|_| AuthError::Hash)?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hash)
}

/// Check a plaintext password against a stored PHC hash.
pub(crate) fn verify_password_hash(stored: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        error!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Derive the session token binding an account id to its current password
/// hash. Valid exactly as long as the credential it was issued against.
#[must_use]
pub fn derive_session_token(user_id: Uuid, password_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.to_string().as_bytes());
    hasher.update(password_hash.as_bytes());
    Base64UrlUnpadded::encode_string(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn salt_has_fixed_length_and_alphabet() {
        let salt = generate_salt();
        assert_eq!(salt.len(), SALT_LENGTH);
        assert!(salt.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }

    #[test]
    fn salts_are_independent() {
        let mut rng = StdRng::seed_from_u64(7);
        let first = generate_salt_with_rng(&mut rng);
        let second = generate_salt_with_rng(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn password_hash_is_deterministic_per_salt_and_password() -> Result<()> {
        let first = derive_password_hash("q3hXf9ZpL2mRw8Kd", "secret1")?;
        let second = derive_password_hash("q3hXf9ZpL2mRw8Kd", "secret1")?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn changing_password_or_salt_changes_the_hash() -> Result<()> {
        let base = derive_password_hash("q3hXf9ZpL2mRw8Kd", "secret1")?;
        assert_ne!(base, derive_password_hash("q3hXf9ZpL2mRw8Kd", "secret2")?);
        assert_ne!(base, derive_password_hash("q3hXf9ZpL2mRw8Ke", "secret1")?);
        Ok(())
    }

    #[test]
    fn verification_matches_derivation() -> Result<()> {
        let hash = derive_password_hash("q3hXf9ZpL2mRw8Kd", "secret1")?;
        assert!(verify_password_hash(&hash, "secret1"));
        assert!(!verify_password_hash(&hash, "secret2"));
        assert!(!verify_password_hash(&hash, "Secret1"));
        Ok(())
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!verify_password_hash("not-a-phc-string", "secret1"));
    }

    #[test]
    fn session_token_tracks_the_password_hash() {
        let id = Uuid::new_v4();
        let token = derive_session_token(id, "hash-a");
        assert_eq!(token, derive_session_token(id, "hash-a"));
        assert_ne!(token, derive_session_token(id, "hash-b"));
        assert_ne!(token, derive_session_token(Uuid::new_v4(), "hash-a"));
    }
}
