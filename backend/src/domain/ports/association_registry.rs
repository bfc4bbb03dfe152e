//! Driving port for the association registry.

use async_trait::async_trait;

use crate::domain::{Association, AssociationId, AssociationName, Error, User, UserId};

/// Input for creating an association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAssociationRequest {
    /// Display name.
    pub name: AssociationName,
    /// Requested members; ids that do not resolve are dropped.
    pub member_ids: Vec<UserId>,
}

/// Input for editing an association; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAssociationRequest {
    /// Replacement name.
    pub name: Option<AssociationName>,
    /// Replacement roster, applied wholesale.
    pub member_ids: Option<Vec<UserId>>,
}

/// Use-cases over associations and their rosters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssociationRegistry: Send + Sync {
    /// All associations with resolved members.
    async fn list(&self) -> Result<Vec<Association>, Error>;

    /// One association; `NotFound` when absent.
    async fn get(&self, id: AssociationId) -> Result<Association, Error>;

    /// Create an association, silently dropping unknown member ids.
    async fn create(&self, request: CreateAssociationRequest) -> Result<Association, Error>;

    /// Rename and/or replace the roster.
    ///
    /// Narrowing the roster leaves role rows behind; run the membership
    /// cleanup afterwards.
    async fn update(
        &self,
        id: AssociationId,
        request: UpdateAssociationRequest,
    ) -> Result<Association, Error>;

    /// Delete an association without touching roles, minutes or events.
    async fn delete(&self, id: AssociationId) -> Result<Association, Error>;

    /// Members of an association; empty when it has none or does not exist.
    async fn members_of(&self, id: AssociationId) -> Result<Vec<User>, Error>;

    /// Associations whose roster contains `user_id`.
    async fn associations_for(&self, user_id: UserId) -> Result<Vec<Association>, Error>;
}
