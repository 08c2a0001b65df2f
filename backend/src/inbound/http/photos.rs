//! Photo HTTP handlers.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    require_owner, Error, LandmarkId, Photo, PhotoDraft, PhotoValidationError, UserId,
};
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Create/replace payload for a photo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequest {
    pub image_url: String,
    pub landmark_id: i32,
}

impl TryFrom<PhotoRequest> for PhotoDraft {
    type Error = PhotoValidationError;

    fn try_from(value: PhotoRequest) -> Result<Self, Self::Error> {
        Self::new(value.image_url, LandmarkId::new(value.landmark_id))
    }
}

/// Public photo representation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: i32,
    pub image_url: String,
    pub user_id: i32,
    pub landmark_id: i32,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            image_url: photo.image_url,
            user_id: photo.user_id.value(),
            landmark_id: photo.landmark_id.value(),
        }
    }
}

fn map_photo_validation_error(err: PhotoValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "imageUrl", "code": "empty_image_url" }))
}

async fn owned_photo(
    state: &HttpState,
    id: i32,
    principal: UserId,
) -> Result<Photo, Error> {
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("photo not found"))?;
    require_owner(photo.user_id, principal)?;
    Ok(photo)
}

/// List all photos.
#[utoipa::path(
    get,
    path = "/photos",
    responses(
        (status = 200, description = "Photos", body = [PhotoResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "listPhotos"
)]
#[get("/photos")]
pub async fn list_photos(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PhotoResponse>>> {
    let photos = state.photos.list().await?;
    Ok(web::Json(photos.into_iter().map(Into::into).collect()))
}

/// Fetch one photo by id.
#[utoipa::path(
    get,
    path = "/photos/{id}",
    params(("id" = i32, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo", body = PhotoResponse),
        (status = 404, description = "Photo not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "getPhoto"
)]
#[get("/photos/{id}")]
pub async fn get_photo(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<PhotoResponse>> {
    let photo = state
        .photos
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| Error::not_found("photo not found"))?;
    Ok(web::Json(photo.into()))
}

/// List the photos uploaded by a user.
#[utoipa::path(
    get,
    path = "/photos/user/{user_id}",
    params(("user_id" = i32, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Photos", body = [PhotoResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "listPhotosByUser"
)]
#[get("/photos/user/{user_id}")]
pub async fn list_photos_by_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<PhotoResponse>>> {
    let photos = state
        .photos
        .list_by_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(photos.into_iter().map(Into::into).collect()))
}

/// List the photos attached to a landmark.
#[utoipa::path(
    get,
    path = "/photos/landmark/{landmark_id}",
    params(("landmark_id" = i32, Path, description = "Landmark id")),
    responses(
        (status = 200, description = "Photos", body = [PhotoResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "listPhotosByLandmark"
)]
#[get("/photos/landmark/{landmark_id}")]
pub async fn list_photos_by_landmark(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<PhotoResponse>>> {
    let photos = state
        .photos
        .list_by_landmark(LandmarkId::new(path.into_inner()))
        .await?;
    Ok(web::Json(photos.into_iter().map(Into::into).collect()))
}

/// Attach a photo to a landmark, owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/photos",
    request_body = PhotoRequest,
    responses(
        (status = 201, description = "Photo created", body = PhotoResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "createPhoto"
)]
#[post("/photos")]
pub async fn create_photo(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: web::Json<PhotoRequest>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let draft =
        PhotoDraft::try_from(payload.into_inner()).map_err(map_photo_validation_error)?;

    let photo = state.photos.insert(principal.id, &draft).await?;
    Ok(HttpResponse::Created().json(PhotoResponse::from(photo)))
}

/// Replace a photo's fields. Owner only.
#[utoipa::path(
    put,
    path = "/photos/{id}",
    params(("id" = i32, Path, description = "Photo id")),
    request_body = PhotoRequest,
    responses(
        (status = 200, description = "Updated photo", body = PhotoResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Photo or landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "updatePhoto"
)]
#[put("/photos/{id}")]
pub async fn update_photo(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
    payload: web::Json<PhotoRequest>,
) -> ApiResult<web::Json<PhotoResponse>> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = path.into_inner();
    owned_photo(&state, id, principal.id).await?;

    let draft =
        PhotoDraft::try_from(payload.into_inner()).map_err(map_photo_validation_error)?;
    let photo = state
        .photos
        .update(id, &draft)
        .await?
        .ok_or_else(|| Error::not_found("photo not found"))?;
    Ok(web::Json(photo.into()))
}

/// Delete a photo. Owner only.
#[utoipa::path(
    delete,
    path = "/photos/{id}",
    params(("id" = i32, Path, description = "Photo id")),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Photo not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "deletePhoto"
)]
#[delete("/photos/{id}")]
pub async fn delete_photo(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = path.into_inner();
    owned_photo(&state, id, principal.id).await?;

    if !state.photos.delete(id).await? {
        return Err(Error::not_found("photo not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
