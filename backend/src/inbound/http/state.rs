//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against mocks without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AssociationRegistry, EventScheduler, MembershipCoordinator, MinuteLedger, RoleLedger,
    UserDirectory,
};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User accounts and authentication.
    pub users: Arc<dyn UserDirectory>,
    /// Associations and their rosters.
    pub associations: Arc<dyn AssociationRegistry>,
    /// Role-annotated views and roster cleanup.
    pub membership: Arc<dyn MembershipCoordinator>,
    /// Role rows.
    pub roles: Arc<dyn RoleLedger>,
    /// Governance minutes.
    pub minutes: Arc<dyn MinuteLedger>,
    /// Events and their notifications.
    pub events: Arc<dyn EventScheduler>,
}
