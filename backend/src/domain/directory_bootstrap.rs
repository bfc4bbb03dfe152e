//! Startup seeding of the user directory.
//!
//! An empty directory is unusable because every route except registration,
//! verification and login requires a session. When credentials are
//! configured, the first start seeds one confirmed administrator.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{CredentialHasher, UserRepository};
use crate::domain::{Age, Email, Error, NewUser, Password, PersonName, User, VerificationToken};

const ADMIN_NAME: &str = "admin";
const ADMIN_AGE: u16 = 21;

/// Credentials of the administrator seeded into an empty directory.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    /// Login email.
    pub email: Email,
    /// Login password.
    pub password: Password,
}

/// What the bootstrap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The directory already had users.
    AlreadyPopulated,
    /// No seed credentials were configured.
    NotConfigured,
    /// The administrator was created.
    Seeded(User),
}

/// Seeds a default administrator when the directory is empty.
#[derive(Clone)]
pub struct DirectoryBootstrap {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl DirectoryBootstrap {
    /// Create a bootstrapper over the user repository.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Seed `seed` as a confirmed user if no user exists yet.
    pub async fn run(&self, seed: Option<&AdminSeed>) -> Result<BootstrapOutcome, Error> {
        if self.users.count().await? > 0 {
            return Ok(BootstrapOutcome::AlreadyPopulated);
        }
        let Some(seed) = seed else {
            warn!("user directory is empty and no default administrator is configured");
            return Ok(BootstrapOutcome::NotConfigured);
        };
        let name = PersonName::new(ADMIN_NAME, "firstname")
            .map_err(|err| Error::internal(format!("default administrator name: {err}")))?;
        let age = Age::new(ADMIN_AGE)
            .map_err(|err| Error::internal(format!("default administrator age: {err}")))?;
        let admin = NewUser {
            email: seed.email.clone(),
            firstname: name.clone(),
            lastname: name,
            age,
            credential: self.hasher.hash(&seed.password)?,
            verified: true,
            verification_token: VerificationToken::generate(),
        };
        let user = self.users.insert(&admin).await?;
        info!(user_id = %user.id(), email = %user.email(), "seeded default administrator");
        Ok(BootstrapOutcome::Seeded(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CredentialHash;
    use crate::domain::ports::{MockCredentialHasher, MockUserRepository};
    use crate::domain::test_fixtures::user_id;

    fn seed() -> AdminSeed {
        AdminSeed {
            email: Email::new("root@hub.example").expect("valid email"),
            password: Password::new("changeme").expect("valid password"),
        }
    }

    fn hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(CredentialHash::new("salt$digest")));
        hasher
    }

    #[tokio::test]
    async fn seeds_confirmed_admin_into_empty_directory() {
        let mut users = MockUserRepository::new();
        users.expect_count().return_once(|| Ok(0));
        users
            .expect_insert()
            .times(1)
            .withf(|fields| fields.verified && fields.email.as_ref() == "root@hub.example")
            .returning(|fields| Ok(User::from_parts(user_id(1), fields.clone())));

        let bootstrap = DirectoryBootstrap::new(Arc::new(users), Arc::new(hasher()));
        let outcome = bootstrap.run(Some(&seed())).await.expect("bootstrap succeeds");

        assert!(matches!(outcome, BootstrapOutcome::Seeded(ref user) if user.is_verified()));
    }

    #[tokio::test]
    async fn leaves_populated_directory_alone() {
        let mut users = MockUserRepository::new();
        users.expect_count().return_once(|| Ok(3));
        users.expect_insert().times(0);

        let bootstrap = DirectoryBootstrap::new(Arc::new(users), Arc::new(hasher()));
        let outcome = bootstrap.run(Some(&seed())).await.expect("bootstrap succeeds");
        assert_eq!(outcome, BootstrapOutcome::AlreadyPopulated);
    }

    #[tokio::test]
    async fn reports_missing_configuration() {
        let mut users = MockUserRepository::new();
        users.expect_count().return_once(|| Ok(0));
        users.expect_insert().times(0);

        let bootstrap = DirectoryBootstrap::new(Arc::new(users), Arc::new(hasher()));
        let outcome = bootstrap.run(None).await.expect("bootstrap succeeds");
        assert_eq!(outcome, BootstrapOutcome::NotConfigured);
    }
}
