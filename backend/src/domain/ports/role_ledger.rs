//! Driving port for the role ledger.

use async_trait::async_trait;

use crate::domain::{AssociationId, Error, ResolvedRole, Role, RoleKey, RoleName, User, UserId};

/// Use-cases over per-(user, association) role rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleLedger: Send + Sync {
    /// Create or overwrite a role; user and association must exist.
    async fn create(&self, key: RoleKey, name: RoleName) -> Result<Role, Error>;

    /// All role rows.
    async fn find_all(&self) -> Result<Vec<Role>, Error>;

    /// One role; `NotFound` when absent.
    async fn find_one(&self, key: RoleKey) -> Result<Role, Error>;

    /// Roles of an association with user and association resolved.
    async fn find_by_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<ResolvedRole>, Error>;

    /// Raw role rows of an association, including orphans.
    async fn rows_for_association(&self, association_id: AssociationId)
    -> Result<Vec<Role>, Error>;

    /// Roles held by a user.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Role>, Error>;

    /// Users holding a role named exactly `name` anywhere.
    async fn find_users_by_role_name(&self, name: &RoleName) -> Result<Vec<User>, Error>;

    /// Rename a role; `NotFound` when absent.
    async fn update(&self, key: RoleKey, name: RoleName) -> Result<Role, Error>;

    /// Delete a role; `NotFound` when absent.
    async fn remove(&self, key: RoleKey) -> Result<Role, Error>;

    /// Delete every listed role that exists; absent rows are not an error.
    async fn delete_many(&self, keys: &[RoleKey]) -> Result<u64, Error>;
}
