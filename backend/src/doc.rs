//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler under `/api/v1`, the health probes and
//! the domain schemas they exchange. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for external tooling.

use crate::domain::{
    Association, AssociationMember, AssociationSummary, AssociationView, Error, ErrorCode, Event,
    Minute, ResolvedRole, Role, User,
};
use crate::inbound::http::associations::{
    CreateAssociationBody, OrphanedRole, ReconcileResponse, UpdateAssociationBody,
};
use crate::inbound::http::events::{CreateEventBody, UpdateEventBody};
use crate::inbound::http::health::{ProbeBody, StorageBackend};
use crate::inbound::http::minutes::{CreateMinuteBody, UpdateMinuteBody};
use crate::inbound::http::roles::{CreateRoleBody, RenameRoleBody};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UpdateUserBody, UserProfile};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Association hub API",
        description = "Users, associations, roles, minutes and events behind a cookie session."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::verify,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::user_roles,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::associations::list_associations,
        crate::inbound::http::associations::create_association,
        crate::inbound::http::associations::get_association,
        crate::inbound::http::associations::update_association,
        crate::inbound::http::associations::delete_association,
        crate::inbound::http::associations::association_members,
        crate::inbound::http::associations::association_minutes,
        crate::inbound::http::associations::association_roles,
        crate::inbound::http::associations::association_events,
        crate::inbound::http::associations::reconcile_association,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::roles::create_role,
        crate::inbound::http::roles::users_by_role_name,
        crate::inbound::http::roles::get_role,
        crate::inbound::http::roles::update_role,
        crate::inbound::http::roles::delete_role,
        crate::inbound::http::minutes::list_minutes,
        crate::inbound::http::minutes::create_minute,
        crate::inbound::http::minutes::get_minute,
        crate::inbound::http::minutes::update_minute,
        crate::inbound::http::minutes::delete_minute,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserProfile,
        Association,
        AssociationSummary,
        AssociationView,
        AssociationMember,
        Role,
        ResolvedRole,
        Minute,
        Event,
        LoginRequest,
        RegisterRequest,
        UpdateUserBody,
        CreateAssociationBody,
        UpdateAssociationBody,
        ReconcileResponse,
        OrphanedRole,
        CreateRoleBody,
        RenameRoleBody,
        CreateMinuteBody,
        UpdateMinuteBody,
        CreateEventBody,
        UpdateEventBody,
        ProbeBody,
        StorageBackend,
    )),
    tags(
        (name = "users", description = "Accounts, login and email confirmation"),
        (name = "associations", description = "Associations and their rosters"),
        (name = "roles", description = "Per-association member roles"),
        (name = "minutes", description = "Governance minutes"),
        (name = "events", description = "Scheduled events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
