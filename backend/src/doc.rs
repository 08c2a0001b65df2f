//! OpenAPI documentation configuration.
//!
//! Registers every REST endpoint and the request/response schemas, plus the
//! bearer token security scheme. The generated specification backs Swagger
//! UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Score};
use crate::inbound::http::landmarks::{LandmarkRequest, LandmarkResponse};
use crate::inbound::http::photos::{PhotoRequest, PhotoResponse};
use crate::inbound::http::ratings::{RatingRequest, RatingResponse};
use crate::inbound::http::users::{
    SigninRequest, SignupRequest, TokenResponse, UpdateUserRequest, UserResponse,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Landmark API",
        description = "CRUD interface for landmarks, photos and ratings with \
                       bearer-token protected mutations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::signin,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_users_by_username,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::landmarks::list_landmarks,
        crate::inbound::http::landmarks::get_landmark,
        crate::inbound::http::landmarks::list_landmarks_by_user,
        crate::inbound::http::landmarks::list_landmarks_by_country,
        crate::inbound::http::landmarks::create_landmark,
        crate::inbound::http::landmarks::update_landmark,
        crate::inbound::http::landmarks::delete_landmark,
        crate::inbound::http::photos::list_photos,
        crate::inbound::http::photos::get_photo,
        crate::inbound::http::photos::list_photos_by_user,
        crate::inbound::http::photos::list_photos_by_landmark,
        crate::inbound::http::photos::create_photo,
        crate::inbound::http::photos::update_photo,
        crate::inbound::http::photos::delete_photo,
        crate::inbound::http::ratings::list_ratings,
        crate::inbound::http::ratings::get_rating,
        crate::inbound::http::ratings::list_ratings_by_user,
        crate::inbound::http::ratings::list_ratings_by_landmark,
        crate::inbound::http::ratings::create_rating,
        crate::inbound::http::ratings::update_rating,
        crate::inbound::http::ratings::delete_rating,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Score,
        SignupRequest,
        SigninRequest,
        UpdateUserRequest,
        UserResponse,
        TokenResponse,
        LandmarkRequest,
        LandmarkResponse,
        PhotoRequest,
        PhotoResponse,
        RatingRequest,
        RatingResponse,
    )),
    tags(
        (name = "users", description = "Accounts, sign-up and sign-in"),
        (name = "landmarks", description = "Landmark catalogue"),
        (name = "photos", description = "Photos attached to landmarks"),
        (name = "ratings", description = "Landmark scores in [1, 5]"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::RefOr;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn every_resource_path_is_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/users/signup",
            "/users/signin",
            "/users",
            "/users/{id}",
            "/landmarks",
            "/landmarks/{id}",
            "/landmarks/country/{country}",
            "/photos/landmark/{landmark_id}",
            "/ratings/{id}",
            "/health/ready",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "path {path} should be documented"
            );
        }
    }
}
