//! Server construction and route wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

use landmark_api::inbound::http::health::{live, ready, HealthState};
use landmark_api::inbound::http::landmarks::{
    create_landmark, delete_landmark, get_landmark, list_landmarks,
    list_landmarks_by_country, list_landmarks_by_user, update_landmark,
};
use landmark_api::inbound::http::photos::{
    create_photo, delete_photo, get_photo, list_photos, list_photos_by_landmark,
    list_photos_by_user, update_photo,
};
use landmark_api::inbound::http::ratings::{
    create_rating, delete_rating, get_rating, list_ratings, list_ratings_by_landmark,
    list_ratings_by_user, update_rating,
};
use landmark_api::inbound::http::state::HttpState;
use landmark_api::inbound::http::users::{
    delete_user, get_user, list_users, list_users_by_username, signin, signup, update_user,
};
use landmark_api::Correlate;
#[cfg(debug_assertions)]
use landmark_api::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Longer literal paths (e.g. /users/username/{username}) are registered
    // before /users/{id}; actix resolves them by segment count so the order
    // is cosmetic, not load-bearing.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Correlate)
        .service(signup)
        .service(signin)
        .service(list_users_by_username)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(list_landmarks_by_user)
        .service(list_landmarks_by_country)
        .service(list_landmarks)
        .service(get_landmark)
        .service(create_landmark)
        .service(update_landmark)
        .service(delete_landmark)
        .service(list_photos_by_user)
        .service(list_photos_by_landmark)
        .service(list_photos)
        .service(get_photo)
        .service(create_photo)
        .service(update_photo)
        .service(delete_photo)
        .service(list_ratings_by_user)
        .service(list_ratings_by_landmark)
        .service(list_ratings)
        .service(get_rating)
        .service(create_rating)
        .service(update_rating)
        .service(delete_rating)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the prepared configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        http_state,
    } = config;
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
