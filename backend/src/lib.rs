//! Association hub library modules.
//!
//! The domain layer owns entities, ports and services. Adapters live under
//! [`inbound`] (HTTP) and [`outbound`] (Diesel, in-memory storage,
//! notification relays, credential hashing).

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
/// Request tracing middleware.
pub use middleware::Trace;
