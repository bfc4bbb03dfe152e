//! Association registry domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    AssociationRegistry, AssociationRepository, CreateAssociationRequest,
    UpdateAssociationRequest, UserRepository,
};
use crate::domain::{Association, AssociationId, Error, NewAssociation, User, UserId};

/// Association registry backed by association and user repositories.
#[derive(Clone)]
pub struct AssociationRegistryService {
    associations: Arc<dyn AssociationRepository>,
    users: Arc<dyn UserRepository>,
}

impl AssociationRegistryService {
    /// Create a service over the given repositories.
    pub fn new(
        associations: Arc<dyn AssociationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            associations,
            users,
        }
    }

    async fn require(&self, id: AssociationId) -> Result<Association, Error> {
        self.associations
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("association {id} not found")))
    }

    /// Keep only the requested ids that name an existing user.
    async fn resolvable(&self, requested: &[UserId]) -> Result<Vec<UserId>, Error> {
        let found = self.users.find_many_by_id(requested).await?;
        Ok(requested
            .iter()
            .copied()
            .filter(|id| found.iter().any(|user| user.id() == *id))
            .collect())
    }
}

#[async_trait]
impl AssociationRegistry for AssociationRegistryService {
    async fn list(&self) -> Result<Vec<Association>, Error> {
        Ok(self.associations.list().await?)
    }

    async fn get(&self, id: AssociationId) -> Result<Association, Error> {
        self.require(id).await
    }

    async fn create(&self, request: CreateAssociationRequest) -> Result<Association, Error> {
        let member_ids = self.resolvable(&request.member_ids).await?;
        let association = NewAssociation::new(request.name, member_ids);
        Ok(self.associations.insert(&association).await?)
    }

    async fn update(
        &self,
        id: AssociationId,
        request: UpdateAssociationRequest,
    ) -> Result<Association, Error> {
        let current = self.require(id).await?;
        let name = request.name.unwrap_or_else(|| current.name().clone());
        let member_ids = match request.member_ids {
            Some(requested) => self.resolvable(&requested).await?,
            None => current.member_ids().collect(),
        };
        self.associations
            .replace(id, &NewAssociation::new(name, member_ids))
            .await?
            .ok_or_else(|| Error::not_found(format!("association {id} not found")))
    }

    async fn delete(&self, id: AssociationId) -> Result<Association, Error> {
        let association = self.require(id).await?;
        if !self.associations.delete(id).await? {
            return Err(Error::not_found(format!("association {id} not found")));
        }
        Ok(association)
    }

    async fn members_of(&self, id: AssociationId) -> Result<Vec<User>, Error> {
        Ok(self
            .associations
            .find_by_id(id)
            .await?
            .map(|association| association.members().to_vec())
            .unwrap_or_default())
    }

    async fn associations_for(&self, user_id: UserId) -> Result<Vec<Association>, Error> {
        Ok(self.associations.list_for_member(user_id).await?)
    }
}

#[cfg(test)]
#[path = "association_registry_service_tests.rs"]
mod tests;
