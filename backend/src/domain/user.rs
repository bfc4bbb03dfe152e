//! User identity records owned by the user directory.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::UserId;

const NAME_MAX: usize = 64;
const AGE_MAX: u16 = 150;
const VERIFICATION_TOKEN_LEN: usize = 16;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was blank or malformed.
    #[error("email must look like name@domain.tld")]
    InvalidEmail,
    /// First or last name was blank.
    #[error("{field} must not be empty")]
    EmptyName {
        /// Offending field.
        field: &'static str,
    },
    /// First or last name exceeded the maximum length.
    #[error("{field} must be at most {max} characters")]
    NameTooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum length.
        max: usize,
    },
    /// Age outside the accepted range.
    #[error("age must be between 0 and {max}")]
    AgeOutOfRange {
        /// Maximum age.
        max: u16,
    },
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Normalised email address, unique across the directory.
///
/// # Examples
/// ```
/// use association_hub::domain::Email;
///
/// let email = Email::new("  Ada@Example.org ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.org");
/// assert!(Email::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.org")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let mut parts = normalised.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..");
        if local.is_empty() || !domain_ok || normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First or last name of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "Lovelace")]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name for the given field.
    pub fn new(raw: impl AsRef<str>, field: &'static str) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = u16, example = 42)]
pub struct Age(u16);

impl Age {
    /// Validate an age in years.
    pub fn new(years: u16) -> Result<Self, UserValidationError> {
        if years > AGE_MAX {
            return Err(UserValidationError::AgeOutOfRange { max: AGE_MAX });
        }
        Ok(Self(years))
    }

    /// Age in years.
    #[must_use]
    pub const fn years(self) -> u16 {
        self.0
    }
}

/// Plain-text password held only long enough to hash or verify it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a caller-supplied password; whitespace is preserved.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    /// Borrow the plain text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Opaque encoded password hash produced by a credential hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(**redacted**)")
    }
}

/// Single-use token mailed to a user to confirm their email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Generate a random alphanumeric token.
    #[must_use]
    pub fn generate() -> Self {
        let token = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(VERIFICATION_TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Wrap a token received from a client or storage.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Fields required to store a new user; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique email.
    pub email: Email,
    /// First name.
    pub firstname: PersonName,
    /// Last name.
    pub lastname: PersonName,
    /// Age in years.
    pub age: Age,
    /// Hashed password.
    pub credential: CredentialHash,
    /// Whether the email is already confirmed.
    pub verified: bool,
    /// Token used to confirm the email.
    pub verification_token: VerificationToken,
}

/// Registered user.
///
/// Serialises without the credential hash and verification token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    id: UserId,
    email: Email,
    firstname: PersonName,
    lastname: PersonName,
    age: Age,
    verified: bool,
    #[serde(skip)]
    credential: CredentialHash,
    #[serde(skip)]
    verification_token: VerificationToken,
}

impl User {
    /// Assemble a stored user from its id and fields.
    #[must_use]
    pub fn from_parts(id: UserId, fields: NewUser) -> Self {
        let NewUser {
            email,
            firstname,
            lastname,
            age,
            credential,
            verified,
            verification_token,
        } = fields;
        Self {
            id,
            email,
            firstname,
            lastname,
            age,
            verified,
            credential,
            verification_token,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Unique email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// First name.
    #[must_use]
    pub const fn firstname(&self) -> &PersonName {
        &self.firstname
    }

    /// Last name.
    #[must_use]
    pub const fn lastname(&self) -> &PersonName {
        &self.lastname
    }

    /// Age in years.
    #[must_use]
    pub const fn age(&self) -> Age {
        self.age
    }

    /// Whether the email has been confirmed.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verified
    }

    /// Stored password hash.
    #[must_use]
    pub const fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    /// Email confirmation token.
    #[must_use]
    pub const fn verification_token(&self) -> &VerificationToken {
        &self.verification_token
    }

    /// Return the stored fields, dropping the id.
    #[must_use]
    pub fn into_fields(self) -> NewUser {
        NewUser {
            email: self.email,
            firstname: self.firstname,
            lastname: self.lastname,
            age: self.age,
            credential: self.credential,
            verified: self.verified,
            verification_token: self.verification_token,
        }
    }

    /// Mark the email as confirmed.
    pub fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Apply a profile patch; the credential must already be hashed.
    pub fn apply(&mut self, patch: UserChanges) {
        let UserChanges {
            firstname,
            lastname,
            age,
            credential,
        } = patch;
        if let Some(firstname) = firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = lastname {
            self.lastname = lastname;
        }
        if let Some(age) = age {
            self.age = age;
        }
        if let Some(credential) = credential {
            self.credential = credential;
        }
    }
}

/// Validated profile changes with the password already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// Replacement first name.
    pub firstname: Option<PersonName>,
    /// Replacement last name.
    pub lastname: Option<PersonName>,
    /// Replacement age.
    pub age: Option<Age>,
    /// Replacement password hash.
    pub credential: Option<CredentialHash>,
}

#[cfg(test)]
mod tests;
