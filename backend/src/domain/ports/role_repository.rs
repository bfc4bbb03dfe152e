//! Port for role persistence.

use async_trait::async_trait;

use crate::domain::{AssociationId, Role, RoleKey, RoleName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by role repository adapters.
    pub enum RoleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "role repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "role repository query failed: {message}" as internal,
    }
}

/// Port for role rows keyed by (user, association).
///
/// Storage enforces no foreign keys on roles; callers own referential checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Insert or overwrite the row for the role's key.
    async fn upsert(&self, role: &Role) -> Result<(), RoleRepositoryError>;

    /// Find the row for `key`.
    async fn find(&self, key: RoleKey) -> Result<Option<Role>, RoleRepositoryError>;

    /// All rows.
    async fn list(&self) -> Result<Vec<Role>, RoleRepositoryError>;

    /// Rows for one association.
    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Role>, RoleRepositoryError>;

    /// Rows held by one user.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Role>, RoleRepositoryError>;

    /// Rows whose name equals `name` exactly.
    async fn list_by_name(&self, name: &RoleName) -> Result<Vec<Role>, RoleRepositoryError>;

    /// Delete one row; returns whether it existed.
    async fn delete(&self, key: RoleKey) -> Result<bool, RoleRepositoryError>;

    /// Delete every listed row that exists; returns how many were removed.
    async fn delete_many(&self, keys: &[RoleKey]) -> Result<u64, RoleRepositoryError>;
}
