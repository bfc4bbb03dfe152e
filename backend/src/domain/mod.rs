//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed governance entities (users,
//! associations, roles, minutes and events), the ports that adapters
//! implement, and the services that enforce cross-entity rules.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Entity types and their validated value types.
//! - Services implementing the driving ports in [`ports`].

pub mod association;
pub mod error;
pub mod event;
pub mod ids;
pub mod minute;
pub mod notification;
pub mod ports;
pub mod role;
pub mod trace_id;
pub mod user;

mod association_registry_service;
mod directory_bootstrap;
mod event_scheduler_service;
mod membership_service;
mod minute_ledger_service;
mod role_ledger_service;
mod user_directory_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::association::{
    Association, AssociationMember, AssociationName, AssociationSummary,
    AssociationValidationError, AssociationView, NewAssociation, member_views,
};
pub use self::association_registry_service::AssociationRegistryService;
pub use self::directory_bootstrap::{AdminSeed, BootstrapOutcome, DirectoryBootstrap};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::event::{Event, EventChanges, EventName, EventValidationError, NewEvent};
pub use self::event_scheduler_service::EventSchedulerService;
pub use self::ids::{AssociationId, EventId, IdValidationError, MinuteId, UserId};
pub use self::membership_service::MembershipService;
pub use self::minute::{
    Minute, MinuteChanges, MinuteContent, MinuteOrdering, MinuteSortField,
    MinuteValidationError, NewMinute, SortOrder,
};
pub use self::minute_ledger_service::MinuteLedgerService;
pub use self::notification::{
    DispatchOutcome, EVENT_CREATED_TOPIC, EventNotification, Notification,
    REGISTRATION_TOPIC, RegistrationNotification,
};
pub use self::role::{
    DEFAULT_ROLE_NAME, ResolvedRole, Role, RoleKey, RoleName, RoleValidationError,
};
pub use self::role_ledger_service::RoleLedgerService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Age, CredentialHash, Email, NewUser, Password, PersonName, User, UserChanges,
    UserValidationError, VerificationToken,
};
pub use self::user_directory_service::UserDirectoryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use association_hub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
