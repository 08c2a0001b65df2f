//! User account HTTP handlers.
//!
//! ```text
//! POST /users/signup {"username":"alice","email":"alice@x.com","password":"pw123"}
//! POST /users/signin {"username":"alice","password":"pw123"} -> {"accessToken":...}
//! GET  /users, /users/{id}, /users/username/{username}
//! PUT/DELETE /users/{id} (bearer, self only)
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    require_owner, validate_profile, Credentials, CredentialValidationError, Error,
    Registration, User, UserId,
};
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<SignupRequest> for Registration {
    type Error = CredentialValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Sign-in request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<SigninRequest> for Credentials {
    type Error = CredentialValidationError;

    fn try_from(value: SigninRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Replacement profile fields.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
}

/// Public account representation; never exposes the password hash.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            username: user.username,
            email: user.email,
        }
    }
}

/// Bearer token issued on successful sign-in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub(crate) fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    let (field, code) = match err {
        CredentialValidationError::EmptyUsername => ("username", "empty_username"),
        CredentialValidationError::UsernameTooLong => ("username", "username_too_long"),
        CredentialValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialValidationError::InvalidEmail => ("email", "invalid_email"),
        CredentialValidationError::EmailTooLong => ("email", "email_too_long"),
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": code }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/users/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(map_credential_validation_error)?;
    let user = state.auth.signup(&registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/users/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Authentication successful", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signin",
    security([])
)]
#[post("/users/signin")]
pub async fn signin(
    state: web::Data<HttpState>,
    payload: web::Json<SigninRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let access_token = state.auth.signin(&credentials).await?;
    Ok(web::Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}

/// List all accounts.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(web::Json(users.into_iter().map(Into::into).collect()))
}

/// Fetch one account by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(user.into()))
}

/// List every account sharing a username. Usernames are not unique, so this
/// can return more than one entry.
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    params(("username" = String, Path, description = "Username to match")),
    responses(
        (status = 200, description = "Matching users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsersByUsername"
)]
#[get("/users/username/{username}")]
pub async fn list_users_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_by_username(&path.into_inner()).await?;
    Ok(web::Json(users.into_iter().map(Into::into).collect()))
}

/// Replace the authenticated user's own profile fields.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not this user's account", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 409, description = "Email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = UserId::new(path.into_inner());
    require_owner(id, principal.id)?;

    let body = payload.into_inner();
    let update = validate_profile(&body.username, &body.email)
        .map_err(map_credential_validation_error)?;

    let user = state
        .users
        .update(id, &update)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(user.into()))
}

/// Delete the authenticated user's own account, cascading to everything the
/// account owns.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not this user's account", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = UserId::new(path.into_inner());
    require_owner(id, principal.id)?;

    if !state.users.delete(id).await? {
        return Err(Error::not_found("user not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
