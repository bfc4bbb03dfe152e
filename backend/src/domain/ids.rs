//! Serial identifiers for the governance entities.
//!
//! Every entity is keyed by a positive `i32` assigned by storage. Wrapping
//! each key in its own newtype keeps a minute id from being passed where an
//! association id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors raised when constructing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The value was zero or negative.
    #[error("{kind} id must be a positive integer, got {value}")]
    NotPositive {
        /// Entity kind, for messages.
        kind: &'static str,
        /// Rejected value.
        value: i64,
    },
    /// The value did not parse as an integer.
    #[error("{kind} id must be an integer, got {raw:?}")]
    NotNumeric {
        /// Entity kind, for messages.
        kind: &'static str,
        /// Rejected input.
        raw: String,
    },
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(try_from = "i32", into = "i32")]
        #[schema(value_type = i32, example = 1)]
        pub struct $name(i32);

        impl $name {
            /// Validate and wrap a raw key.
            pub fn new(value: i32) -> Result<Self, IdValidationError> {
                if value <= 0 {
                    return Err(IdValidationError::NotPositive {
                        kind: $kind,
                        value: i64::from(value),
                    });
                }
                Ok(Self(value))
            }

            /// Raw storage key.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl TryFrom<i32> for $name {
            type Error = IdValidationError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let value = raw.trim().parse::<i32>().map_err(|_| IdValidationError::NotNumeric {
                    kind: $kind,
                    raw: raw.to_owned(),
                })?;
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user.
    UserId,
    "user"
);
entity_id!(
    /// Identifier of an association.
    AssociationId,
    "association"
);
entity_id!(
    /// Identifier of a governance minute.
    MinuteId,
    "minute"
);
entity_id!(
    /// Identifier of a scheduled event.
    EventId,
    "event"
);
