//! Association endpoints.
//!
//! Reads return role-annotated views; roster replacement runs through the
//! membership coordinator so stale roles are cleared in the same request.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CleanupReport, CreateAssociationRequest, UpdateAssociationRequest};
use crate::domain::{
    Association, AssociationId, AssociationMember, AssociationName, AssociationView, Error, Event,
    Minute, MinuteOrdering, MinuteSortField, ResolvedRole, SortOrder, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, body_id_list, field_value, optional_field_value, parse_id,
};

const ASSOCIATION_ID: FieldName = FieldName::new("id");
const MEMBER_IDS: FieldName = FieldName::new("idUsers");

/// Body of `POST /api/v1/associations`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssociationBody {
    /// Display name.
    #[schema(example = "Chess Club")]
    pub name: String,
    /// Member ids; unknown ids are dropped.
    #[serde(default)]
    pub id_users: Vec<i32>,
}

/// Body of `PUT /api/v1/associations/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssociationBody {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement roster; replaces the whole member set.
    pub id_users: Option<Vec<i32>>,
}

/// Ordering of `GET /api/v1/associations/{id}/minutes`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MinuteListQuery {
    /// One of `content`, `date`, `association`, `voters`. Defaults to `date`.
    pub sort: Option<String>,
    /// `ASC` or `DESC`, case-insensitive. Defaults to `DESC`.
    pub order: Option<String>,
}

impl MinuteListQuery {
    fn ordering(&self) -> Result<MinuteOrdering, Error> {
        let field = optional_field_value(
            self.sort.as_deref(),
            FieldName::new("sort"),
            str::parse::<MinuteSortField>,
        )?
        .unwrap_or_default();
        let order = optional_field_value(
            self.order.as_deref(),
            FieldName::new("order"),
            str::parse::<SortOrder>,
        )?
        .unwrap_or_default();
        Ok(MinuteOrdering::new(field, order))
    }
}

/// An orphaned role removed by reconciliation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedRole {
    /// Former member.
    pub user_id: UserId,
    /// Association the role applied to.
    pub association_id: AssociationId,
}

/// Outcome of `POST /api/v1/associations/{id}/reconcile`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileResponse {
    /// Roles whose holder was no longer on the roster.
    pub orphaned: Vec<OrphanedRole>,
    /// Rows deleted by storage.
    pub removed: u64,
}

impl From<CleanupReport> for ReconcileResponse {
    fn from(report: CleanupReport) -> Self {
        Self {
            orphaned: report
                .orphaned
                .into_iter()
                .map(|key| OrphanedRole {
                    user_id: key.user_id,
                    association_id: key.association_id,
                })
                .collect(),
            removed: report.removed,
        }
    }
}

impl TryFrom<CreateAssociationBody> for CreateAssociationRequest {
    type Error = Error;

    fn try_from(body: CreateAssociationBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: field_value(AssociationName::new(&body.name), FieldName::new("name"))?,
            member_ids: body_id_list(body.id_users, MEMBER_IDS)?,
        })
    }
}

impl TryFrom<UpdateAssociationBody> for UpdateAssociationRequest {
    type Error = Error;

    fn try_from(body: UpdateAssociationBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: optional_field_value(body.name, FieldName::new("name"), AssociationName::new)?,
            member_ids: body
                .id_users
                .map(|ids| body_id_list(ids, MEMBER_IDS))
                .transpose()?,
        })
    }
}

fn association_id(path: &str) -> Result<AssociationId, Error> {
    parse_id(path, ASSOCIATION_ID)
}

/// All associations with role-annotated members.
#[utoipa::path(
    get,
    path = "/api/v1/associations",
    responses(
        (status = 200, description = "Associations", body = [AssociationView]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["associations"],
    operation_id = "listAssociations"
)]
#[get("/associations")]
pub async fn list_associations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AssociationView>>> {
    session.require_user_id()?;
    Ok(web::Json(state.membership.views().await?))
}

/// Create an association.
#[utoipa::path(
    post,
    path = "/api/v1/associations",
    request_body = CreateAssociationBody,
    responses(
        (status = 201, description = "Created", body = Association),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["associations"],
    operation_id = "createAssociation"
)]
#[post("/associations")]
pub async fn create_association(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAssociationBody>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let request = CreateAssociationRequest::try_from(payload.into_inner())?;
    let association = state.associations.create(request).await?;
    Ok(HttpResponse::Created().json(association))
}

/// One association with role-annotated members.
#[utoipa::path(
    get,
    path = "/api/v1/associations/{id}",
    params(("id" = i32, Path, description = "Association id")),
    responses(
        (status = 200, description = "Association", body = AssociationView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "getAssociation"
)]
#[get("/associations/{id}")]
pub async fn get_association(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AssociationView>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    Ok(web::Json(state.membership.view(id).await?))
}

/// Rename and/or replace the roster, clearing roles of removed members.
#[utoipa::path(
    put,
    path = "/api/v1/associations/{id}",
    params(("id" = i32, Path, description = "Association id")),
    request_body = UpdateAssociationBody,
    responses(
        (status = 200, description = "Updated", body = AssociationView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "updateAssociation"
)]
#[put("/associations/{id}")]
pub async fn update_association(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateAssociationBody>,
) -> ApiResult<web::Json<AssociationView>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    let request = UpdateAssociationRequest::try_from(payload.into_inner())?;
    Ok(web::Json(state.membership.update_membership(id, request).await?))
}

/// Delete an association.
#[utoipa::path(
    delete,
    path = "/api/v1/associations/{id}",
    params(("id" = i32, Path, description = "Association id")),
    responses(
        (status = 200, description = "Deleted", body = Association),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "deleteAssociation"
)]
#[delete("/associations/{id}")]
pub async fn delete_association(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Association>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    Ok(web::Json(state.associations.delete(id).await?))
}

/// Members with their role names.
#[utoipa::path(
    get,
    path = "/api/v1/associations/{id}/members",
    params(("id" = i32, Path, description = "Association id")),
    responses(
        (status = 200, description = "Members", body = [AssociationMember]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["associations"],
    operation_id = "listAssociationMembers"
)]
#[get("/associations/{id}/members")]
pub async fn association_members(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<AssociationMember>>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    Ok(web::Json(state.membership.member_views(id).await?))
}

/// Minutes of an association in the requested order.
#[utoipa::path(
    get,
    path = "/api/v1/associations/{id}/minutes",
    params(("id" = i32, Path, description = "Association id"), MinuteListQuery),
    responses(
        (status = 200, description = "Minutes", body = [Minute]),
        (status = 400, description = "Invalid sort", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "listAssociationMinutes"
)]
#[get("/associations/{id}/minutes")]
pub async fn association_minutes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<MinuteListQuery>,
) -> ApiResult<web::Json<Vec<Minute>>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    let ordering = query.ordering()?;
    state.associations.get(id).await?;
    Ok(web::Json(state.minutes.find_for_association(id, ordering).await?))
}

/// Roles held in an association.
#[utoipa::path(
    get,
    path = "/api/v1/associations/{id}/roles",
    params(("id" = i32, Path, description = "Association id")),
    responses(
        (status = 200, description = "Roles", body = [ResolvedRole]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "listAssociationRoles"
)]
#[get("/associations/{id}/roles")]
pub async fn association_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ResolvedRole>>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    state.associations.get(id).await?;
    Ok(web::Json(state.roles.find_by_association(id).await?))
}

/// Events of an association.
#[utoipa::path(
    get,
    path = "/api/v1/associations/{id}/events",
    params(("id" = i32, Path, description = "Association id")),
    responses(
        (status = 200, description = "Events", body = [Event]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "listAssociationEvents"
)]
#[get("/associations/{id}/events")]
pub async fn association_events(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Event>>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    state.associations.get(id).await?;
    Ok(web::Json(state.events.find_for_association(id).await?))
}

/// Re-run role cleanup for an association.
#[utoipa::path(
    post,
    path = "/api/v1/associations/{id}/reconcile",
    params(("id" = i32, Path, description = "Association id")),
    responses(
        (status = 200, description = "Cleanup report", body = ReconcileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown association", body = Error)
    ),
    tags = ["associations"],
    operation_id = "reconcileAssociation"
)]
#[post("/associations/{id}/reconcile")]
pub async fn reconcile_association(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReconcileResponse>> {
    session.require_user_id()?;
    let id = association_id(&path)?;
    let report = state.membership.reconcile(id).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
#[path = "associations_tests.rs"]
mod tests;
