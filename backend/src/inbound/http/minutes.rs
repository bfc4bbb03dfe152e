//! Minute ledger endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Minute, MinuteChanges, MinuteContent, MinuteId, NewMinute};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, body_id, body_id_list, field_value, optional_field_value, parse_date, parse_id,
};

const MINUTE_ID: FieldName = FieldName::new("id");
const CONTENT: FieldName = FieldName::new("content");
const DATE: FieldName = FieldName::new("date");
const VOTERS: FieldName = FieldName::new("idVoters");
const ASSOCIATION: FieldName = FieldName::new("idAssociation");

/// Body of `POST /api/v1/minutes`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMinuteBody {
    /// Body text.
    pub content: String,
    /// Voter ids; every id must resolve.
    #[serde(default)]
    pub id_voters: Vec<i32>,
    /// Meeting date.
    #[schema(example = "2021-03-01")]
    pub date: String,
    /// Owning association.
    pub id_association: i32,
}

/// Body of `PUT /api/v1/minutes/{id}`; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMinuteBody {
    /// Replacement text.
    pub content: Option<String>,
    /// Replacement voter roster.
    pub id_voters: Option<Vec<i32>>,
    /// Replacement date.
    pub date: Option<String>,
    /// Move to another association.
    pub id_association: Option<i32>,
}

impl TryFrom<CreateMinuteBody> for NewMinute {
    type Error = Error;

    fn try_from(body: CreateMinuteBody) -> Result<Self, Self::Error> {
        Ok(Self {
            association_id: body_id(body.id_association, ASSOCIATION)?,
            content: field_value(MinuteContent::new(body.content), CONTENT)?,
            date: parse_date(&body.date, DATE)?,
            voter_ids: body_id_list(body.id_voters, VOTERS)?,
        })
    }
}

impl TryFrom<UpdateMinuteBody> for MinuteChanges {
    type Error = Error;

    fn try_from(body: UpdateMinuteBody) -> Result<Self, Self::Error> {
        Ok(Self {
            content: optional_field_value(body.content, CONTENT, MinuteContent::new)?,
            date: body.date.as_deref().map(|raw| parse_date(raw, DATE)).transpose()?,
            association_id: body
                .id_association
                .map(|raw| body_id(raw, ASSOCIATION))
                .transpose()?,
            voter_ids: body
                .id_voters
                .map(|ids| body_id_list(ids, VOTERS))
                .transpose()?,
        })
    }
}

/// All minutes.
#[utoipa::path(
    get,
    path = "/api/v1/minutes",
    responses(
        (status = 200, description = "Minutes", body = [Minute]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["minutes"],
    operation_id = "listMinutes"
)]
#[get("/minutes")]
pub async fn list_minutes(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Minute>>> {
    session.require_user_id()?;
    Ok(web::Json(state.minutes.find_all().await?))
}

/// Record a minute.
#[utoipa::path(
    post,
    path = "/api/v1/minutes",
    request_body = CreateMinuteBody,
    responses(
        (status = 201, description = "Recorded", body = Minute),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association or voter", body = Error)
    ),
    tags = ["minutes"],
    operation_id = "createMinute"
)]
#[post("/minutes")]
pub async fn create_minute(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateMinuteBody>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let minute = NewMinute::try_from(payload.into_inner())?;
    let stored = state.minutes.create(minute).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// One minute.
#[utoipa::path(
    get,
    path = "/api/v1/minutes/{id}",
    params(("id" = i32, Path, description = "Minute id")),
    responses(
        (status = 200, description = "Minute", body = Minute),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown minute", body = Error)
    ),
    tags = ["minutes"],
    operation_id = "getMinute"
)]
#[get("/minutes/{id}")]
pub async fn get_minute(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Minute>> {
    session.require_user_id()?;
    let id: MinuteId = parse_id(&path, MINUTE_ID)?;
    Ok(web::Json(state.minutes.find_one(id).await?))
}

/// Edit a minute.
#[utoipa::path(
    put,
    path = "/api/v1/minutes/{id}",
    params(("id" = i32, Path, description = "Minute id")),
    request_body = UpdateMinuteBody,
    responses(
        (status = 200, description = "Updated", body = Minute),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown minute, association or voter", body = Error)
    ),
    tags = ["minutes"],
    operation_id = "updateMinute"
)]
#[put("/minutes/{id}")]
pub async fn update_minute(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateMinuteBody>,
) -> ApiResult<web::Json<Minute>> {
    session.require_user_id()?;
    let id: MinuteId = parse_id(&path, MINUTE_ID)?;
    let changes = MinuteChanges::try_from(payload.into_inner())?;
    Ok(web::Json(state.minutes.update(id, changes).await?))
}

/// Remove a minute.
#[utoipa::path(
    delete,
    path = "/api/v1/minutes/{id}",
    params(("id" = i32, Path, description = "Minute id")),
    responses(
        (status = 200, description = "Removed", body = Minute),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown minute", body = Error)
    ),
    tags = ["minutes"],
    operation_id = "deleteMinute"
)]
#[delete("/minutes/{id}")]
pub async fn delete_minute(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Minute>> {
    session.require_user_id()?;
    let id: MinuteId = parse_id(&path, MINUTE_ID)?;
    Ok(web::Json(state.minutes.remove(id).await?))
}
