//! Shared Diesel error mapping for the repositories.
//!
//! Every repository port exposes `Connection` and `Query` variants; the user
//! repository adds a duplicate-email variant fed by [`FailureKind::UniqueViolation`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    /// The connection dropped.
    Connection,
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Anything else.
    Query,
}

/// Classify a Diesel error and log its context at debug level.
pub(crate) fn classify(error: &DieselError) -> FailureKind {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => FailureKind::Connection,
                DatabaseErrorKind::UniqueViolation => FailureKind::UniqueViolation,
                _ => FailureKind::Query,
            }
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            FailureKind::Query
        }
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map a Diesel error onto query/connection constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match classify(&error) {
        FailureKind::Connection => connection("database connection error"),
        FailureKind::UniqueViolation => query("unique constraint violated"),
        FailureKind::Query if matches!(error, DieselError::NotFound) => query("record not found"),
        FailureKind::Query => query("database error"),
    }
}

/// Generate `map_pool_error`/`map_diesel_error` for a port error type.
macro_rules! basic_error_mappers {
    ($error:ident) => {
        fn map_pool_error(error: $crate::outbound::persistence::pool::PoolError) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::map_basic_pool_error(
                error,
                |message| $error::connection(message),
            )
        }

        fn map_diesel_error(error: diesel::result::Error) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::map_basic_diesel_error(
                error,
                |message| $error::query(message),
                |message| $error::connection(message),
            )
        }

        fn map_row_error(message: String) -> $error {
            $error::query(format!("stored row is invalid: {message}"))
        }
    };
}

pub(crate) use basic_error_mappers;

/// Builders for Diesel failures in adapter unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

    #[derive(Debug)]
    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    /// A database error of the given kind.
    pub(crate) fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom")))
    }
}
