//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL
//! via `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories translate between rows and domain
//!   types. Cross-entity rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Validated reads**: rows are rebuilt through the domain constructors;
//!   a row that fails validation surfaces as a query error.
//!
//! # Example
//!
//! ```ignore
//! use association_hub::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/hub")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_association_repository;
mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_minute_repository;
mod diesel_role_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_association_repository::DieselAssociationRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_minute_repository::DieselMinuteRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
