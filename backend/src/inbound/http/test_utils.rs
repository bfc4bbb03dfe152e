//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockAssociationRegistry, MockEventScheduler, MockMembershipCoordinator, MockMinuteLedger,
    MockRoleLedger, MockUserDirectory,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const SIGN_IN_PATH: &str = "/test/sign-in";

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Mocked driving ports; set expectations, then turn into state.
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUserDirectory,
    pub associations: MockAssociationRegistry,
    pub membership: MockMembershipCoordinator,
    pub roles: MockRoleLedger,
    pub minutes: MockMinuteLedger,
    pub events: MockEventScheduler,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            users: Arc::new(self.users),
            associations: Arc::new(self.associations),
            membership: Arc::new(self.membership),
            roles: Arc::new(self.roles),
            minutes: Arc::new(self.minutes),
            events: Arc::new(self.events),
        })
    }
}

async fn sign_in(session: SessionContext, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(id)?;
    Ok(HttpResponse::Ok().finish())
}

/// App with session support, error handlers and handlers under `/api/v1`.
pub fn test_app<F>(
    state: web::Data<HttpState>,
    configure: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(test_session_middleware())
        .route(&format!("{SIGN_IN_PATH}/{{id}}"), web::post().to(sign_in))
        .service(web::scope("/api/v1").configure(configure))
}

/// Session cookie for `user_id`, obtained through the test sign-in route.
pub async fn signed_in<S>(app: &S, user_id: i32) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "test sign-in failed");
    session_cookie(&res)
}
