//! Builders for repository adapters and the HTTP state wired over them.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use url::Url;

use association_hub::domain::ports::{
    AssociationRegistry, AssociationRepository, CredentialHasher, EventRepository,
    MinuteRepository, NotificationPublisher, RoleLedger, RoleRepository, UserRepository,
};
use association_hub::domain::{
    AssociationRegistryService, DirectoryBootstrap, EventSchedulerService, MembershipService,
    MinuteLedgerService, RoleLedgerService, UserDirectoryService,
};
use association_hub::inbound::http::health::StorageBackend;
use association_hub::inbound::http::state::HttpState;
use association_hub::outbound::credentials::Argon2CredentialHasher;
use association_hub::outbound::memory::InMemoryStore;
use association_hub::outbound::persistence::{
    DbPool, DieselAssociationRepository, DieselEventRepository, DieselMinuteRepository,
    DieselRoleRepository, DieselUserRepository,
};
use association_hub::outbound::queue::{HttpNotificationPublisher, LoggingNotificationPublisher};

/// Driven ports shared by the domain services and startup tasks.
#[derive(Clone)]
pub struct Repositories {
    pub(crate) storage: StorageBackend,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) associations: Arc<dyn AssociationRepository>,
    pub(crate) roles: Arc<dyn RoleRepository>,
    pub(crate) minutes: Arc<dyn MinuteRepository>,
    pub(crate) events: Arc<dyn EventRepository>,
}

impl Repositories {
    /// Every port backed by one shared in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            storage: StorageBackend::Memory,
            users: Arc::new(store.clone()),
            associations: Arc::new(store.clone()),
            roles: Arc::new(store.clone()),
            minutes: Arc::new(store.clone()),
            events: Arc::new(store),
        }
    }

    /// Every port backed by PostgreSQL through `pool`.
    #[must_use]
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            storage: StorageBackend::Postgres,
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            associations: Arc::new(DieselAssociationRepository::new(pool.clone())),
            roles: Arc::new(DieselRoleRepository::new(pool.clone())),
            minutes: Arc::new(DieselMinuteRepository::new(pool.clone())),
            events: Arc::new(DieselEventRepository::new(pool.clone())),
        }
    }

    /// Storage the repositories write to.
    #[must_use]
    pub const fn storage(&self) -> StorageBackend {
        self.storage
    }

    /// Seeder for the default administrator.
    #[must_use]
    pub fn bootstrap(&self) -> DirectoryBootstrap {
        DirectoryBootstrap::new(self.users.clone(), credential_hasher())
    }
}

fn credential_hasher() -> Arc<dyn CredentialHasher> {
    Arc::new(Argon2CredentialHasher::new())
}

/// Pick the notification transport: an HTTP relay when an endpoint is
/// configured, structured logs otherwise.
pub fn build_publisher(
    endpoint: Option<&str>,
    timeout: Duration,
) -> color_eyre::Result<Arc<dyn NotificationPublisher>> {
    let Some(raw) = endpoint else {
        return Ok(Arc::new(LoggingNotificationPublisher::new()));
    };
    let endpoint = Url::parse(raw)?;
    Ok(Arc::new(HttpNotificationPublisher::new(endpoint, timeout)?))
}

/// Build the shared HTTP state over `repositories`.
pub(super) fn build_http_state(
    repositories: &Repositories,
    publisher: Arc<dyn NotificationPublisher>,
    frontend_url: Option<String>,
) -> web::Data<HttpState> {
    let Repositories {
        storage: _,
        users,
        associations,
        roles,
        minutes,
        events,
    } = repositories.clone();

    let registry: Arc<dyn AssociationRegistry> = Arc::new(AssociationRegistryService::new(
        associations.clone(),
        users.clone(),
    ));
    let ledger: Arc<dyn RoleLedger> = Arc::new(RoleLedgerService::new(
        roles,
        users.clone(),
        associations.clone(),
    ));

    web::Data::new(HttpState {
        users: Arc::new(UserDirectoryService::new(
            users.clone(),
            credential_hasher(),
            publisher.clone(),
            frontend_url,
        )),
        associations: registry.clone(),
        membership: Arc::new(MembershipService::new(registry, ledger.clone())),
        roles: ledger,
        minutes: Arc::new(MinuteLedgerService::new(minutes, associations.clone(), users)),
        events: Arc::new(EventSchedulerService::new(events, associations, publisher)),
    })
}
