//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserId, VerificationToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}" as internal,
        /// The email is already registered.
        DuplicateEmail { email: String } =>
            "email {email} is already registered" as conflict,
    }
}

/// Port for reading and writing user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned id.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Overwrite a stored user's fields.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Find the users matching `ids`; missing ids are simply absent.
    async fn find_many_by_id(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Find the user holding a verification token.
    async fn find_by_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, UserRepositoryError>;

    /// Delete a user; returns whether a row was removed.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;
}
