//! Port for minute persistence.

use async_trait::async_trait;

use crate::domain::{AssociationId, Minute, MinuteId, NewMinute};

use super::define_port_error;

define_port_error! {
    /// Errors raised by minute repository adapters.
    pub enum MinuteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "minute repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "minute repository query failed: {message}" as internal,
    }
}

/// Port for minutes and their voter rosters.
///
/// A minute and its roster are written atomically by the adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MinuteRepository: Send + Sync {
    /// Store a new minute.
    async fn insert(&self, minute: &NewMinute) -> Result<Minute, MinuteRepositoryError>;

    /// Overwrite an existing minute; `None` when it does not exist.
    async fn replace(
        &self,
        id: MinuteId,
        minute: &NewMinute,
    ) -> Result<Option<Minute>, MinuteRepositoryError>;

    /// Find a minute by id.
    async fn find_by_id(&self, id: MinuteId) -> Result<Option<Minute>, MinuteRepositoryError>;

    /// All minutes ordered by id.
    async fn list(&self) -> Result<Vec<Minute>, MinuteRepositoryError>;

    /// Minutes of one association, unordered.
    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Minute>, MinuteRepositoryError>;

    /// Delete a minute; returns whether it existed.
    async fn delete(&self, id: MinuteId) -> Result<bool, MinuteRepositoryError>;
}
