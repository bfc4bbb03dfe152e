//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{Repositories, build_publisher};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use association_hub::Trace;
#[cfg(debug_assertions)]
use association_hub::doc::ApiDoc;
use association_hub::inbound::http::associations::{
    association_events, association_members, association_minutes, association_roles,
    create_association, delete_association, get_association, list_associations,
    reconcile_association, update_association,
};
use association_hub::inbound::http::error::{json_error_handler, query_error_handler};
use association_hub::inbound::http::events::{
    create_event, delete_event, get_event, list_events, update_event,
};
use association_hub::inbound::http::health::{HealthState, live, ready};
use association_hub::inbound::http::minutes::{
    create_minute, delete_minute, get_minute, list_minutes, update_minute,
};
use association_hub::inbound::http::roles::{
    create_role, delete_role, get_role, list_roles, update_role, users_by_role_name,
};
use association_hub::inbound::http::state::HttpState;
use association_hub::inbound::http::users::{
    delete_user, get_user, list_users, login, logout, register, update_user, user_roles, verify,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Register the `/api/v1` handlers.
///
/// Literal segments are registered before parameterised siblings:
/// `/users/verify` before `/users/{id}` and `/roles/users/{name}` before
/// `/roles/{user}/{association}`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(register)
        .service(verify)
        .service(list_users)
        .service(user_roles)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(list_associations)
        .service(create_association)
        .service(association_members)
        .service(association_minutes)
        .service(association_roles)
        .service(association_events)
        .service(reconcile_association)
        .service(get_association)
        .service(update_association)
        .service(delete_association)
        .service(list_roles)
        .service(create_role)
        .service(users_by_role_name)
        .service(get_role)
        .service(update_role)
        .service(delete_role)
        .service(list_minutes)
        .service(create_minute)
        .service(get_minute)
        .service(update_minute)
        .service(delete_minute)
        .service(list_events)
        .service(create_event)
        .service(get_event)
        .service(update_event)
        .service(delete_event);
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        repositories,
        publisher,
        frontend_url,
    } = config;
    let http_state = build_http_state(&repositories, publisher, frontend_url);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
