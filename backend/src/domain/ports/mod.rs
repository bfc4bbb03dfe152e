//! Domain ports.
//!
//! Driven ports (`*Repository`, [`NotificationPublisher`],
//! [`CredentialHasher`]) are implemented by outbound adapters. Driving ports
//! ([`UserDirectory`], [`AssociationRegistry`], [`RoleLedger`],
//! [`MinuteLedger`], [`EventScheduler`], [`MembershipCoordinator`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;

pub(crate) use macros::define_port_error;

mod association_registry;
mod association_repository;
mod credential_hasher;
mod event_repository;
mod event_scheduler;
mod membership_coordinator;
mod minute_ledger;
mod minute_repository;
mod notification_publisher;
mod role_ledger;
mod role_repository;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use association_registry::MockAssociationRegistry;
pub use association_registry::{
    AssociationRegistry, CreateAssociationRequest, UpdateAssociationRequest,
};
#[cfg(test)]
pub use association_repository::MockAssociationRepository;
pub use association_repository::{AssociationRepository, AssociationRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use event_scheduler::MockEventScheduler;
pub use event_scheduler::EventScheduler;
#[cfg(test)]
pub use membership_coordinator::MockMembershipCoordinator;
pub use membership_coordinator::{CleanupReport, MembershipCoordinator};
#[cfg(test)]
pub use minute_ledger::MockMinuteLedger;
pub use minute_ledger::MinuteLedger;
#[cfg(test)]
pub use minute_repository::MockMinuteRepository;
pub use minute_repository::{MinuteRepository, MinuteRepositoryError};
#[cfg(test)]
pub use notification_publisher::MockNotificationPublisher;
pub use notification_publisher::{NotificationPublisher, NotificationPublisherError};
#[cfg(test)]
pub use role_ledger::MockRoleLedger;
pub use role_ledger::RoleLedger;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{RoleRepository, RoleRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{RegisterUserRequest, UpdateUserRequest, UserDirectory};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
