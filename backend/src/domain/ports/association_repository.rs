//! Port for association persistence.

use async_trait::async_trait;

use crate::domain::{Association, AssociationId, NewAssociation, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by association repository adapters.
    pub enum AssociationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "association repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "association repository query failed: {message}" as internal,
    }
}

/// Port for associations and their rosters.
///
/// Member ids handed to the adapter are already resolved against the user
/// directory; returned associations carry their members eagerly loaded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssociationRepository: Send + Sync {
    /// Store a new association with its roster.
    async fn insert(
        &self,
        association: &NewAssociation,
    ) -> Result<Association, AssociationRepositoryError>;

    /// Overwrite name and roster of an existing association.
    ///
    /// Returns `None` when the association does not exist.
    async fn replace(
        &self,
        id: AssociationId,
        association: &NewAssociation,
    ) -> Result<Option<Association>, AssociationRepositoryError>;

    /// Find an association by id.
    async fn find_by_id(
        &self,
        id: AssociationId,
    ) -> Result<Option<Association>, AssociationRepositoryError>;

    /// All associations ordered by id.
    async fn list(&self) -> Result<Vec<Association>, AssociationRepositoryError>;

    /// Associations whose roster contains `user_id`.
    async fn list_for_member(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Association>, AssociationRepositoryError>;

    /// Delete an association and its roster rows; returns whether it existed.
    async fn delete(&self, id: AssociationId) -> Result<bool, AssociationRepositoryError>;
}
