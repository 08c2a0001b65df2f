//! Landmark HTTP handlers.
//!
//! Reads are public; create/update/delete require a bearer token and, for
//! existing rows, ownership.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    require_owner, Error, Landmark, LandmarkDraft, LandmarkId, LandmarkValidationError, UserId,
};
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Create/replace payload for a landmark.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub image_url: String,
}

impl TryFrom<LandmarkRequest> for LandmarkDraft {
    type Error = LandmarkValidationError;

    fn try_from(value: LandmarkRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.name,
            value.description,
            value.location,
            value.country,
            value.image_url,
        )
    }
}

/// Public landmark representation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub image_url: String,
    pub user_id: i32,
}

impl From<Landmark> for LandmarkResponse {
    fn from(landmark: Landmark) -> Self {
        Self {
            id: landmark.id.value(),
            name: landmark.name,
            description: landmark.description,
            location: landmark.location,
            country: landmark.country,
            image_url: landmark.image_url,
            user_id: landmark.user_id.value(),
        }
    }
}

fn map_landmark_validation_error(err: LandmarkValidationError) -> Error {
    let code = match err {
        LandmarkValidationError::EmptyName => "empty_name",
        LandmarkValidationError::NameTooLong => "name_too_long",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "name", "code": code }))
}

async fn owned_landmark(
    state: &HttpState,
    id: LandmarkId,
    principal: UserId,
) -> Result<Landmark, Error> {
    let landmark = state
        .landmarks
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("landmark not found"))?;
    require_owner(landmark.user_id, principal)?;
    Ok(landmark)
}

/// List all landmarks.
#[utoipa::path(
    get,
    path = "/landmarks",
    responses(
        (status = 200, description = "Landmarks", body = [LandmarkResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "listLandmarks"
)]
#[get("/landmarks")]
pub async fn list_landmarks(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LandmarkResponse>>> {
    let landmarks = state.landmarks.list().await?;
    Ok(web::Json(landmarks.into_iter().map(Into::into).collect()))
}

/// Fetch one landmark by id.
#[utoipa::path(
    get,
    path = "/landmarks/{id}",
    params(("id" = i32, Path, description = "Landmark id")),
    responses(
        (status = 200, description = "Landmark", body = LandmarkResponse),
        (status = 404, description = "Landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "getLandmark"
)]
#[get("/landmarks/{id}")]
pub async fn get_landmark(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<LandmarkResponse>> {
    let landmark = state
        .landmarks
        .find_by_id(LandmarkId::new(path.into_inner()))
        .await?
        .ok_or_else(|| Error::not_found("landmark not found"))?;
    Ok(web::Json(landmark.into()))
}

/// List the landmarks owned by a user.
#[utoipa::path(
    get,
    path = "/landmarks/user/{user_id}",
    params(("user_id" = i32, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Landmarks", body = [LandmarkResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "listLandmarksByUser"
)]
#[get("/landmarks/user/{user_id}")]
pub async fn list_landmarks_by_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<LandmarkResponse>>> {
    let landmarks = state
        .landmarks
        .list_by_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(landmarks.into_iter().map(Into::into).collect()))
}

/// List the landmarks in a country.
#[utoipa::path(
    get,
    path = "/landmarks/country/{country}",
    params(("country" = String, Path, description = "Country name")),
    responses(
        (status = 200, description = "Landmarks", body = [LandmarkResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "listLandmarksByCountry"
)]
#[get("/landmarks/country/{country}")]
pub async fn list_landmarks_by_country(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<LandmarkResponse>>> {
    let landmarks = state.landmarks.list_by_country(&path.into_inner()).await?;
    Ok(web::Json(landmarks.into_iter().map(Into::into).collect()))
}

/// Create a landmark owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/landmarks",
    request_body = LandmarkRequest,
    responses(
        (status = 201, description = "Landmark created", body = LandmarkResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "createLandmark"
)]
#[post("/landmarks")]
pub async fn create_landmark(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: web::Json<LandmarkRequest>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let draft = LandmarkDraft::try_from(payload.into_inner())
        .map_err(map_landmark_validation_error)?;

    // Owner comes from the token, never from the payload.
    let landmark = state.landmarks.insert(principal.id, &draft).await?;
    Ok(HttpResponse::Created().json(LandmarkResponse::from(landmark)))
}

/// Replace a landmark's fields. Only the owner may update; the owner itself
/// is immutable.
#[utoipa::path(
    put,
    path = "/landmarks/{id}",
    params(("id" = i32, Path, description = "Landmark id")),
    request_body = LandmarkRequest,
    responses(
        (status = 200, description = "Updated landmark", body = LandmarkResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "updateLandmark"
)]
#[put("/landmarks/{id}")]
pub async fn update_landmark(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
    payload: web::Json<LandmarkRequest>,
) -> ApiResult<web::Json<LandmarkResponse>> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = LandmarkId::new(path.into_inner());
    owned_landmark(&state, id, principal.id).await?;

    let draft = LandmarkDraft::try_from(payload.into_inner())
        .map_err(map_landmark_validation_error)?;
    let landmark = state
        .landmarks
        .update(id, &draft)
        .await?
        .ok_or_else(|| Error::not_found("landmark not found"))?;
    Ok(web::Json(landmark.into()))
}

/// Delete a landmark, cascading to its photos and ratings. Owner only.
#[utoipa::path(
    delete,
    path = "/landmarks/{id}",
    params(("id" = i32, Path, description = "Landmark id")),
    responses(
        (status = 204, description = "Landmark deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["landmarks"],
    operation_id = "deleteLandmark"
)]
#[delete("/landmarks/{id}")]
pub async fn delete_landmark(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = LandmarkId::new(path.into_inner());
    owned_landmark(&state, id, principal.id).await?;

    if !state.landmarks.delete(id).await? {
        return Err(Error::not_found("landmark not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
