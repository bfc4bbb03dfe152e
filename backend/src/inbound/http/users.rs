//! User directory endpoints.
//!
//! ```text
//! POST   /api/v1/login            {"email":"ada@example.org","password":"..."}
//! POST   /api/v1/logout
//! POST   /api/v1/users            register (public)
//! GET    /api/v1/users/verify?t=  confirm email (public)
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}       profile with associations
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! GET    /api/v1/users/{id}/roles
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{RegisterUserRequest, UpdateUserRequest};
use crate::domain::{
    Age, AssociationSummary, Email, Error, Password, PersonName, Role, User, UserId,
    VerificationToken,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_value, optional_field_value, parse_id};

const USER_ID: FieldName = FieldName::new("id");

/// Body of `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Registered email.
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Body of `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Age in years.
    pub age: i64,
    /// Email, unique across the directory.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Body of `PUT /api/v1/users/{id}`; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserBody {
    /// Replacement first name.
    pub firstname: Option<String>,
    /// Replacement last name.
    pub lastname: Option<String>,
    /// Replacement age.
    pub age: Option<i64>,
    /// Replacement password.
    pub password: Option<String>,
}

/// Query of `GET /api/v1/users/verify`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyQuery {
    /// Verification token from the confirmation mail.
    pub t: String,
}

/// A user together with the associations listing them.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    /// The user.
    #[serde(flatten)]
    pub user: User,
    /// Associations whose roster contains the user.
    pub associations: Vec<AssociationSummary>,
}

fn parse_age(raw: i64) -> Result<Age, Error> {
    let years = u16::try_from(raw).map_err(|_| {
        Error::invalid_request("age must be between 0 and 150")
            .with_details(serde_json::json!({ "field": "age", "code": "invalid_value" }))
    })?;
    field_value(Age::new(years), FieldName::new("age"))
}

impl TryFrom<RegisterRequest> for RegisterUserRequest {
    type Error = Error;

    fn try_from(body: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: field_value(Email::new(&body.email), FieldName::new("email"))?,
            firstname: field_value(
                PersonName::new(&body.firstname, "firstname"),
                FieldName::new("firstname"),
            )?,
            lastname: field_value(
                PersonName::new(&body.lastname, "lastname"),
                FieldName::new("lastname"),
            )?,
            age: parse_age(body.age)?,
            password: field_value(Password::new(body.password), FieldName::new("password"))?,
        })
    }
}

impl TryFrom<UpdateUserBody> for UpdateUserRequest {
    type Error = Error;

    fn try_from(body: UpdateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            firstname: optional_field_value(body.firstname, FieldName::new("firstname"), |raw| {
                PersonName::new(raw, "firstname")
            })?,
            lastname: optional_field_value(body.lastname, FieldName::new("lastname"), |raw| {
                PersonName::new(raw, "lastname")
            })?,
            age: body.age.map(parse_age).transpose()?,
            password: optional_field_value(body.password, FieldName::new("password"), Password::new)?,
        })
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Email not confirmed", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let LoginRequest { email, password } = payload.into_inner();
    let email = field_value(Email::new(email), FieldName::new("email"))?;
    let password = field_value(Password::new(password), FieldName::new("password"))?;
    let user = state.users.authenticate(&email, &password).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Register a new, unconfirmed account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = RegisterUserRequest::try_from(payload.into_inner())?;
    let user = state.users.register(request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Confirm an email address.
#[utoipa::path(
    get,
    path = "/api/v1/users/verify",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Confirmed", body = User),
        (status = 403, description = "Already confirmed", body = Error),
        (status = 404, description = "Unknown token", body = Error)
    ),
    tags = ["users"],
    operation_id = "verifyUser",
    security([])
)]
#[get("/users/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    query: web::Query<VerifyQuery>,
) -> ApiResult<web::Json<User>> {
    let token = VerificationToken::new(query.into_inner().t);
    Ok(web::Json(state.users.verify(&token).await?))
}

/// List users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_user_id()?;
    Ok(web::Json(state.users.find_all().await?))
}

/// A user with their associations.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    session.require_user_id()?;
    let id: UserId = parse_id(&path, USER_ID)?;
    let user = state.users.find_one(id).await?;
    let associations = state
        .associations
        .associations_for(id)
        .await?
        .iter()
        .map(|association| association.summary())
        .collect();
    Ok(web::Json(UserProfile { user, associations }))
}

/// Roles held by a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/roles",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Roles", body = [Role]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserRoles"
)]
#[get("/users/{id}/roles")]
pub async fn user_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Role>>> {
    session.require_user_id()?;
    let id: UserId = parse_id(&path, USER_ID)?;
    Ok(web::Json(state.roles.find_by_user(id).await?))
}

/// Edit a profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<User>> {
    session.require_user_id()?;
    let id: UserId = parse_id(&path, USER_ID)?;
    let request = UpdateUserRequest::try_from(payload.into_inner())?;
    Ok(web::Json(state.users.update(id, request).await?))
}

/// Delete another user's account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Self-deletion", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let acting = session.require_user_id()?;
    let target: UserId = parse_id(&path, USER_ID)?;
    Ok(web::Json(state.users.delete(acting, target).await?))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
