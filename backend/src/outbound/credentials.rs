//! Argon2id credential hasher.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...$<salt>$<hash>`),
//! so the algorithm parameters travel with each hash and verification
//! compares digests in constant time.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{CredentialHash, Password};

/// [`CredentialHasher`] backed by Argon2id with the crate's default cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    /// Create a hasher with the default Argon2id parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &Password) -> Result<CredentialHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
        Ok(CredentialHash::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &Password,
        hash: &CredentialHash,
    ) -> Result<bool, CredentialHasherError> {
        let parsed =
            PasswordHash::new(hash.as_str()).map_err(|_| CredentialHasherError::malformed_hash())?;
        match Argon2::default().verify_password(password.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(_) => Err(CredentialHasherError::malformed_hash()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::new()
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("non-empty password")
    }

    #[rstest]
    fn hash_then_verify_accepts_the_same_password(hasher: Argon2CredentialHasher) {
        let stored = hasher.hash(&password("correct horse")).expect("hash");
        assert_eq!(hasher.verify(&password("correct horse"), &stored), Ok(true));
        assert_eq!(hasher.verify(&password("wrong horse"), &stored), Ok(false));
    }

    #[rstest]
    fn hashes_use_argon2id_phc_strings(hasher: Argon2CredentialHasher) {
        let stored = hasher.hash(&password("secret")).expect("hash");
        assert!(stored.as_str().starts_with("$argon2id$"));
        assert!(!stored.as_str().contains("secret"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2CredentialHasher) {
        let first = hasher.hash(&password("secret")).expect("hash");
        let second = hasher.hash(&password("secret")).expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[case("no-separator")]
    #[case("salt$digest")]
    #[case("$argon2id$")]
    #[case("")]
    fn malformed_hashes_are_rejected(hasher: Argon2CredentialHasher, #[case] raw: &str) {
        let result = hasher.verify(&password("secret"), &CredentialHash::new(raw));
        assert_eq!(result, Err(CredentialHasherError::MalformedHash));
    }
}
