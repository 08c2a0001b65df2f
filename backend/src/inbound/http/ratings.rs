//! Rating HTTP handlers.
//!
//! The `[1, 5]` score range is enforced here at write time, before any
//! repository call.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    require_owner, Error, LandmarkId, Rating, RatingDraft, Score, UserId,
};
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Create/replace payload for a rating. The score is validated into range
/// before any write.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub score: i32,
    pub landmark_id: i32,
}

impl TryFrom<RatingRequest> for RatingDraft {
    type Error = Error;

    fn try_from(value: RatingRequest) -> Result<Self, Self::Error> {
        let score = Score::new(value.score).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "score",
                "value": value.score,
                "code": "score_out_of_range",
            }))
        })?;
        Ok(Self {
            score,
            landmark_id: LandmarkId::new(value.landmark_id),
        })
    }
}

/// Public rating representation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: i32,
    pub score: i32,
    pub user_id: i32,
    pub landmark_id: i32,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            score: rating.score.value(),
            user_id: rating.user_id.value(),
            landmark_id: rating.landmark_id.value(),
        }
    }
}

async fn owned_rating(
    state: &HttpState,
    id: i32,
    principal: UserId,
) -> Result<Rating, Error> {
    let rating = state
        .ratings
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("rating not found"))?;
    require_owner(rating.user_id, principal)?;
    Ok(rating)
}

/// List all ratings.
#[utoipa::path(
    get,
    path = "/ratings",
    responses(
        (status = 200, description = "Ratings", body = [RatingResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "listRatings"
)]
#[get("/ratings")]
pub async fn list_ratings(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RatingResponse>>> {
    let ratings = state.ratings.list().await?;
    Ok(web::Json(ratings.into_iter().map(Into::into).collect()))
}

/// Fetch one rating by id.
#[utoipa::path(
    get,
    path = "/ratings/{id}",
    params(("id" = i32, Path, description = "Rating id")),
    responses(
        (status = 200, description = "Rating", body = RatingResponse),
        (status = 404, description = "Rating not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "getRating"
)]
#[get("/ratings/{id}")]
pub async fn get_rating(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<RatingResponse>> {
    let rating = state
        .ratings
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| Error::not_found("rating not found"))?;
    Ok(web::Json(rating.into()))
}

/// List the ratings submitted by a user.
#[utoipa::path(
    get,
    path = "/ratings/user/{user_id}",
    params(("user_id" = i32, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Ratings", body = [RatingResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "listRatingsByUser"
)]
#[get("/ratings/user/{user_id}")]
pub async fn list_ratings_by_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<RatingResponse>>> {
    let ratings = state
        .ratings
        .list_by_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ratings.into_iter().map(Into::into).collect()))
}

/// List the ratings for a landmark.
#[utoipa::path(
    get,
    path = "/ratings/landmark/{landmark_id}",
    params(("landmark_id" = i32, Path, description = "Landmark id")),
    responses(
        (status = 200, description = "Ratings", body = [RatingResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "listRatingsByLandmark"
)]
#[get("/ratings/landmark/{landmark_id}")]
pub async fn list_ratings_by_landmark(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<RatingResponse>>> {
    let ratings = state
        .ratings
        .list_by_landmark(LandmarkId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ratings.into_iter().map(Into::into).collect()))
}

/// Score a landmark as the authenticated user.
#[utoipa::path(
    post,
    path = "/ratings",
    request_body = RatingRequest,
    responses(
        (status = 201, description = "Rating created", body = RatingResponse),
        (status = 400, description = "Score out of range", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "createRating"
)]
#[post("/ratings")]
pub async fn create_rating(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: web::Json<RatingRequest>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let draft = RatingDraft::try_from(payload.into_inner())?;

    let rating = state.ratings.insert(principal.id, &draft).await?;
    Ok(HttpResponse::Created().json(RatingResponse::from(rating)))
}

/// Replace a rating's fields. Owner only; the range check applies again.
#[utoipa::path(
    put,
    path = "/ratings/{id}",
    params(("id" = i32, Path, description = "Rating id")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Updated rating", body = RatingResponse),
        (status = 400, description = "Score out of range", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Rating or landmark not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "updateRating"
)]
#[put("/ratings/{id}")]
pub async fn update_rating(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
    payload: web::Json<RatingRequest>,
) -> ApiResult<web::Json<RatingResponse>> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = path.into_inner();
    owned_rating(&state, id, principal.id).await?;

    let draft = RatingDraft::try_from(payload.into_inner())?;
    let rating = state
        .ratings
        .update(id, &draft)
        .await?
        .ok_or_else(|| Error::not_found("rating not found"))?;
    Ok(web::Json(rating.into()))
}

/// Delete a rating. Owner only.
#[utoipa::path(
    delete,
    path = "/ratings/{id}",
    params(("id" = i32, Path, description = "Rating id")),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Rating not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "deleteRating"
)]
#[delete("/ratings/{id}")]
pub async fn delete_rating(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let principal = state.auth.resolve_bearer(bearer.token()).await?;
    let id = path.into_inner();
    owned_rating(&state, id, principal.id).await?;

    if !state.ratings.delete(id).await? {
        return Err(Error::not_found("rating not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
