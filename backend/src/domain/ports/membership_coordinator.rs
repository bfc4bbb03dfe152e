//! Driving port joining rosters with roles.
//!
//! Roster edits and role cleanup are separate steps against storage. This
//! port runs them back to back and exposes the cleanup on its own so it can
//! be replayed.

use async_trait::async_trait;

use crate::domain::{AssociationId, AssociationMember, AssociationView, Error, RoleKey};

use super::UpdateAssociationRequest;

/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Role rows found without a matching membership.
    pub orphaned: Vec<RoleKey>,
    /// Rows actually deleted by this pass.
    pub removed: u64,
}

/// Use-cases that span the association registry and the role ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCoordinator: Send + Sync {
    /// All associations with members annotated by role.
    async fn views(&self) -> Result<Vec<AssociationView>, Error>;

    /// One association with members annotated by role.
    async fn view(&self, id: AssociationId) -> Result<AssociationView, Error>;

    /// Members of an association annotated by role.
    async fn member_views(&self, id: AssociationId) -> Result<Vec<AssociationMember>, Error>;

    /// Edit an association, then delete roles of members no longer listed.
    async fn update_membership(
        &self,
        id: AssociationId,
        request: UpdateAssociationRequest,
    ) -> Result<AssociationView, Error>;

    /// Delete roles whose holder is not a current member; idempotent.
    async fn reconcile(&self, id: AssociationId) -> Result<CleanupReport, Error>;
}
