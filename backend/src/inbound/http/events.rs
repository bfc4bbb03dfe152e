//! Event scheduler endpoints.
//!
//! Creating an event also notifies the association's members; delivery
//! failures are logged by the scheduler and never fail the request.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Event, EventChanges, EventId, EventName, NewEvent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, body_id, field_value, optional_field_value, parse_id,
    parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp,
};

const EVENT_ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const START: FieldName = FieldName::new("start");
const END: FieldName = FieldName::new("end");
const ASSOCIATION: FieldName = FieldName::new("association");

/// Body of `POST /api/v1/events`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEventBody {
    /// Display name.
    #[schema(example = "General assembly")]
    pub name: String,
    /// Start instant, RFC 3339.
    #[schema(example = "2021-06-01T18:00:00Z")]
    pub start: String,
    /// End instant, RFC 3339.
    #[schema(example = "2021-06-01T20:00:00Z")]
    pub end: String,
    /// Owning association id.
    pub association: i32,
}

/// Body of `PUT /api/v1/events/{id}`; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateEventBody {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement start.
    pub start: Option<String>,
    /// Replacement end.
    pub end: Option<String>,
    /// Move to another association.
    pub association: Option<i32>,
}

impl TryFrom<CreateEventBody> for NewEvent {
    type Error = Error;

    fn try_from(body: CreateEventBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: field_value(EventName::new(&body.name), NAME)?,
            start: parse_rfc3339_timestamp(&body.start, START)?,
            end: parse_rfc3339_timestamp(&body.end, END)?,
            association_id: body_id(body.association, ASSOCIATION)?,
        })
    }
}

impl TryFrom<UpdateEventBody> for EventChanges {
    type Error = Error;

    fn try_from(body: UpdateEventBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: optional_field_value(body.name, NAME, EventName::new)?,
            start: parse_optional_rfc3339_timestamp(body.start.as_deref(), START)?,
            end: parse_optional_rfc3339_timestamp(body.end.as_deref(), END)?,
            association_id: body
                .association
                .map(|raw| body_id(raw, ASSOCIATION))
                .transpose()?,
        })
    }
}

/// All events.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Events", body = [Event]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Event>>> {
    session.require_user_id()?;
    Ok(web::Json(state.events.find_all().await?))
}

/// Schedule an event and notify the members.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventBody,
    responses(
        (status = 201, description = "Scheduled", body = Event),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventBody>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let event = NewEvent::try_from(payload.into_inner())?;
    let stored = state.events.create(event).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// One event.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown event", body = Error)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Event>> {
    session.require_user_id()?;
    let id: EventId = parse_id(&path, EVENT_ID)?;
    Ok(web::Json(state.events.find_one(id).await?))
}

/// Edit an event.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    request_body = UpdateEventBody,
    responses(
        (status = 200, description = "Updated", body = Event),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown event or association", body = Error)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[put("/events/{id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateEventBody>,
) -> ApiResult<web::Json<Event>> {
    session.require_user_id()?;
    let id: EventId = parse_id(&path, EVENT_ID)?;
    let changes = EventChanges::try_from(payload.into_inner())?;
    Ok(web::Json(state.events.update(id, changes).await?))
}

/// Cancel an event.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Removed", body = Event),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown event", body = Error)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Event>> {
    session.require_user_id()?;
    let id: EventId = parse_id(&path, EVENT_ID)?;
    Ok(web::Json(state.events.remove(id).await?))
}
