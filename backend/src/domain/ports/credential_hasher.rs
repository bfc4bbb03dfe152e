//! Port for password hashing.

use crate::domain::{CredentialHash, Password};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHasherError {
        /// The stored hash could not be decoded.
        MalformedHash => "stored credential hash is malformed" as internal,
        /// The password could not be hashed.
        Hashing { message: String } => "password hashing failed: {message}" as internal,
    }
}

/// Hashes and verifies passwords.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash a password with a fresh salt.
    fn hash(&self, password: &Password) -> Result<CredentialHash, CredentialHasherError>;

    /// Check a password against a stored hash.
    fn verify(&self, password: &Password, hash: &CredentialHash)
    -> Result<bool, CredentialHasherError>;
}
