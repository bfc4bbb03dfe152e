//! Membership coordination across the registry and the role ledger.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AssociationRegistry, CleanupReport, MembershipCoordinator, RoleLedger,
    UpdateAssociationRequest,
};
use crate::domain::{
    Association, AssociationId, AssociationMember, AssociationView, Error, ErrorCode, Role,
    member_views,
};

/// Coordinator built on the registry and role ledger driving ports.
#[derive(Clone)]
pub struct MembershipService {
    registry: Arc<dyn AssociationRegistry>,
    ledger: Arc<dyn RoleLedger>,
}

impl MembershipService {
    /// Create a coordinator over the given ports.
    pub fn new(registry: Arc<dyn AssociationRegistry>, ledger: Arc<dyn RoleLedger>) -> Self {
        Self { registry, ledger }
    }

    /// Delete roles held by non-members; returns the report and the kept rows.
    async fn cleanup(
        &self,
        association: &Association,
    ) -> Result<(CleanupReport, Vec<Role>), Error> {
        let roles = self.ledger.rows_for_association(association.id()).await?;
        let (kept, dropped): (Vec<Role>, Vec<Role>) = roles
            .into_iter()
            .partition(|role| association.has_member(role.user_id()));
        let orphaned: Vec<_> = dropped.iter().map(Role::key).collect();
        let removed = self.ledger.delete_many(&orphaned).await?;
        if removed > 0 {
            info!(
                association_id = %association.id(),
                removed,
                "removed roles of former members"
            );
        }
        Ok((CleanupReport { orphaned, removed }, kept))
    }
}

#[async_trait]
impl MembershipCoordinator for MembershipService {
    async fn views(&self) -> Result<Vec<AssociationView>, Error> {
        let associations = self.registry.list().await?;
        let roles = self.ledger.find_all().await?;
        Ok(associations
            .iter()
            .map(|association| association.view(&roles))
            .collect())
    }

    async fn view(&self, id: AssociationId) -> Result<AssociationView, Error> {
        let association = self.registry.get(id).await?;
        let roles = self.ledger.rows_for_association(id).await?;
        Ok(association.view(&roles))
    }

    async fn member_views(&self, id: AssociationId) -> Result<Vec<AssociationMember>, Error> {
        let association = match self.registry.get(id).await {
            Ok(association) => association,
            Err(error) if error.code() == ErrorCode::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error),
        };
        let roles = self.ledger.rows_for_association(id).await?;
        Ok(member_views(&association, &roles))
    }

    async fn update_membership(
        &self,
        id: AssociationId,
        request: UpdateAssociationRequest,
    ) -> Result<AssociationView, Error> {
        let association = self.registry.update(id, request).await?;
        let (_, kept) = self.cleanup(&association).await?;
        Ok(association.view(&kept))
    }

    async fn reconcile(&self, id: AssociationId) -> Result<CleanupReport, Error> {
        let association = self.registry.get(id).await?;
        let (report, _) = self.cleanup(&association).await?;
        Ok(report)
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
