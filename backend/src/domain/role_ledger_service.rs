//! Role ledger domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::association::dedup_ids;
use crate::domain::ports::{AssociationRepository, RoleLedger, RoleRepository, UserRepository};
use crate::domain::{AssociationId, Error, ResolvedRole, Role, RoleKey, RoleName, User, UserId};

fn role_not_found(key: RoleKey) -> Error {
    Error::not_found(format!(
        "no role for user {} in association {}",
        key.user_id, key.association_id
    ))
}

/// Role ledger backed by role, user and association repositories.
#[derive(Clone)]
pub struct RoleLedgerService {
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
    associations: Arc<dyn AssociationRepository>,
}

impl RoleLedgerService {
    /// Create a service over the given repositories.
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        users: Arc<dyn UserRepository>,
        associations: Arc<dyn AssociationRepository>,
    ) -> Self {
        Self {
            roles,
            users,
            associations,
        }
    }

    async fn require(&self, key: RoleKey) -> Result<Role, Error> {
        self.roles
            .find(key)
            .await?
            .ok_or_else(|| role_not_found(key))
    }
}

#[async_trait]
impl RoleLedger for RoleLedgerService {
    async fn create(&self, key: RoleKey, name: RoleName) -> Result<Role, Error> {
        if self.users.find_by_id(key.user_id).await?.is_none() {
            return Err(Error::not_found(format!("user {} not found", key.user_id)));
        }
        if self
            .associations
            .find_by_id(key.association_id)
            .await?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "association {} not found",
                key.association_id
            )));
        }
        let role = Role::new(key.user_id, key.association_id, name);
        self.roles.upsert(&role).await?;
        Ok(role)
    }

    async fn find_all(&self) -> Result<Vec<Role>, Error> {
        Ok(self.roles.list().await?)
    }

    async fn find_one(&self, key: RoleKey) -> Result<Role, Error> {
        self.require(key).await
    }

    async fn find_by_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<ResolvedRole>, Error> {
        let Some(association) = self.associations.find_by_id(association_id).await? else {
            return Ok(Vec::new());
        };
        let roles = self.roles.list_for_association(association_id).await?;
        let holder_ids = dedup_ids(roles.iter().map(Role::user_id));
        let holders = self.users.find_many_by_id(&holder_ids).await?;
        let summary = association.summary();
        Ok(roles
            .into_iter()
            .filter_map(|role| {
                let user = holders.iter().find(|user| user.id() == role.user_id())?;
                Some(ResolvedRole {
                    name: role.name().clone(),
                    user: user.clone(),
                    association: summary.clone(),
                })
            })
            .collect())
    }

    async fn rows_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Role>, Error> {
        Ok(self.roles.list_for_association(association_id).await?)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Role>, Error> {
        Ok(self.roles.list_for_user(user_id).await?)
    }

    async fn find_users_by_role_name(&self, name: &RoleName) -> Result<Vec<User>, Error> {
        let roles = self.roles.list_by_name(name).await?;
        let holder_ids = dedup_ids(roles.iter().map(Role::user_id));
        Ok(self.users.find_many_by_id(&holder_ids).await?)
    }

    async fn update(&self, key: RoleKey, name: RoleName) -> Result<Role, Error> {
        let mut role = self.require(key).await?;
        role.rename(name);
        self.roles.upsert(&role).await?;
        Ok(role)
    }

    async fn remove(&self, key: RoleKey) -> Result<Role, Error> {
        let role = self.require(key).await?;
        if !self.roles.delete(key).await? {
            return Err(role_not_found(key));
        }
        Ok(role)
    }

    async fn delete_many(&self, keys: &[RoleKey]) -> Result<u64, Error> {
        if keys.is_empty() {
            return Ok(0);
        }
        Ok(self.roles.delete_many(keys).await?)
    }
}

#[cfg(test)]
#[path = "role_ledger_service_tests.rs"]
mod tests;
