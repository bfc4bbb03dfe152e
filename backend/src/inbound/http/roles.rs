//! Role ledger endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AssociationId, Error, Role, RoleKey, RoleName, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, body_id, field_value, parse_id};

/// Body of `POST /api/v1/roles`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleBody {
    /// Role holder.
    pub id_user: i32,
    /// Association the role applies to.
    pub id_association: i32,
    /// Role title.
    #[schema(example = "President")]
    pub name: String,
}

/// Body of `PUT /api/v1/roles/{user}/{association}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RenameRoleBody {
    /// Replacement title.
    pub name: String,
}

fn role_name(raw: &str) -> Result<RoleName, Error> {
    field_value(RoleName::new(raw), FieldName::new("name"))
}

fn role_key(path: &(String, String)) -> Result<RoleKey, Error> {
    let (user, association) = path;
    Ok(RoleKey::new(
        parse_id::<UserId>(user, FieldName::new("user"))?,
        parse_id::<AssociationId>(association, FieldName::new("association"))?,
    ))
}

/// All role rows.
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "Roles", body = [Role]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["roles"],
    operation_id = "listRoles"
)]
#[get("/roles")]
pub async fn list_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Role>>> {
    session.require_user_id()?;
    Ok(web::Json(state.roles.find_all().await?))
}

/// Create or overwrite the role of a user in an association.
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = CreateRoleBody,
    responses(
        (status = 201, description = "Stored", body = Role),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user or association", body = Error)
    ),
    tags = ["roles"],
    operation_id = "createRole"
)]
#[post("/roles")]
pub async fn create_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRoleBody>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let body = payload.into_inner();
    let key = RoleKey::new(
        body_id(body.id_user, FieldName::new("idUser"))?,
        body_id(body.id_association, FieldName::new("idAssociation"))?,
    );
    let role = state.roles.create(key, role_name(&body.name)?).await?;
    Ok(HttpResponse::Created().json(role))
}

/// Users holding a role with the given title, in any association.
#[utoipa::path(
    get,
    path = "/api/v1/roles/users/{name}",
    params(("name" = String, Path, description = "Role title")),
    responses(
        (status = 200, description = "Holders", body = [User]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["roles"],
    operation_id = "listRoleHolders"
)]
#[get("/roles/users/{name}")]
pub async fn users_by_role_name(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_user_id()?;
    let name = role_name(&path)?;
    Ok(web::Json(state.roles.find_users_by_role_name(&name).await?))
}

/// One role row.
#[utoipa::path(
    get,
    path = "/api/v1/roles/{user}/{association}",
    params(
        ("user" = i32, Path, description = "User id"),
        ("association" = i32, Path, description = "Association id")
    ),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No role for the pair", body = Error)
    ),
    tags = ["roles"],
    operation_id = "getRole"
)]
#[get("/roles/{user}/{association}")]
pub async fn get_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Role>> {
    session.require_user_id()?;
    let key = role_key(&path)?;
    Ok(web::Json(state.roles.find_one(key).await?))
}

/// Rename a role.
#[utoipa::path(
    put,
    path = "/api/v1/roles/{user}/{association}",
    params(
        ("user" = i32, Path, description = "User id"),
        ("association" = i32, Path, description = "Association id")
    ),
    request_body = RenameRoleBody,
    responses(
        (status = 200, description = "Renamed", body = Role),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No role for the pair", body = Error)
    ),
    tags = ["roles"],
    operation_id = "updateRole"
)]
#[put("/roles/{user}/{association}")]
pub async fn update_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<RenameRoleBody>,
) -> ApiResult<web::Json<Role>> {
    session.require_user_id()?;
    let key = role_key(&path)?;
    let name = role_name(&payload.name)?;
    Ok(web::Json(state.roles.update(key, name).await?))
}

/// Remove a role.
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{user}/{association}",
    params(
        ("user" = i32, Path, description = "User id"),
        ("association" = i32, Path, description = "Association id")
    ),
    responses(
        (status = 200, description = "Removed", body = Role),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No role for the pair", body = Error)
    ),
    tags = ["roles"],
    operation_id = "deleteRole"
)]
#[delete("/roles/{user}/{association}")]
pub async fn delete_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Role>> {
    session.require_user_id()?;
    let key = role_key(&path)?;
    Ok(web::Json(state.roles.remove(key).await?))
}
