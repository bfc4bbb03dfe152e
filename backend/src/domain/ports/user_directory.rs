//! Driving port for the user directory.

use async_trait::async_trait;

use crate::domain::{Age, Email, Error, Password, PersonName, User, UserId, VerificationToken};

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    /// Unique email.
    pub email: Email,
    /// First name.
    pub firstname: PersonName,
    /// Last name.
    pub lastname: PersonName,
    /// Age in years.
    pub age: Age,
    /// Plain-text password, hashed before storage.
    pub password: Password,
}

/// Validated profile edit; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    /// Replacement first name.
    pub firstname: Option<PersonName>,
    /// Replacement last name.
    pub lastname: Option<PersonName>,
    /// Replacement age.
    pub age: Option<Age>,
    /// Replacement password, re-hashed before storage.
    pub password: Option<Password>,
}

/// Use-cases over user identity records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a user and send the confirmation mail.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// All users.
    async fn find_all(&self) -> Result<Vec<User>, Error>;

    /// One user; `NotFound` when absent.
    async fn find_one(&self, id: UserId) -> Result<User, Error>;

    /// The users that resolve among `ids`; callers compare counts.
    async fn find_many_by_id(&self, ids: &[UserId]) -> Result<Vec<User>, Error>;

    /// Look a user up by email, optionally requiring a confirmed account.
    async fn find_by_email(&self, email: &Email, must_be_verified: bool) -> Result<User, Error>;

    /// Confirm the account holding `token`.
    async fn verify(&self, token: &VerificationToken) -> Result<User, Error>;

    /// Apply a profile edit.
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, Error>;

    /// Delete `target` on behalf of `acting`; self-deletion is forbidden.
    async fn delete(&self, acting: UserId, target: UserId) -> Result<User, Error>;

    /// Check credentials of a confirmed account.
    async fn authenticate(&self, email: &Email, password: &Password) -> Result<User, Error>;
}
