//! End-to-end behaviour over the full HTTP surface, backed by the in-memory
//! store so the suite runs without PostgreSQL. Cascade and foreign-key
//! semantics mirror the database schema.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use landmark_api::domain::{TokenSigner, DEFAULT_TTL};
use landmark_api::inbound::http::landmarks;
use landmark_api::inbound::http::photos;
use landmark_api::inbound::http::ratings;
use landmark_api::inbound::http::state::HttpState;
use landmark_api::inbound::http::users;
use landmark_api::Correlate;

const TEST_SECRET: &[u8] = b"integration-secret-that-is-32-bytes!";

fn signer() -> TokenSigner {
    TokenSigner::new(TEST_SECRET.to_vec(), DEFAULT_TTL).expect("valid signer")
}

fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Correlate)
        .service(users::signup)
        .service(users::signin)
        .service(users::list_users_by_username)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(landmarks::list_landmarks_by_user)
        .service(landmarks::list_landmarks_by_country)
        .service(landmarks::list_landmarks)
        .service(landmarks::get_landmark)
        .service(landmarks::create_landmark)
        .service(landmarks::update_landmark)
        .service(landmarks::delete_landmark)
        .service(photos::list_photos_by_user)
        .service(photos::list_photos_by_landmark)
        .service(photos::list_photos)
        .service(photos::get_photo)
        .service(photos::create_photo)
        .service(photos::update_photo)
        .service(photos::delete_photo)
        .service(ratings::list_ratings_by_user)
        .service(ratings::list_ratings_by_landmark)
        .service(ratings::list_ratings)
        .service(ratings::get_rating)
        .service(ratings::create_rating)
        .service(ratings::update_rating)
        .service(ratings::delete_rating)
}

/// Build an initialised test service over a fresh in-memory store.
macro_rules! fresh_app {
    () => {{
        let state = web::Data::new(HttpState::in_memory(signer()));
        test::init_service(build_app(state)).await
    }};
}

async fn signup<S, B>(app: &S, username: &str, email: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/users/signup")
            .set_json(json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 201, "signup should succeed");
    test::read_body_json(res).await
}

async fn signin<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/users/signin")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "signin should succeed");
    let body: Value = test::read_body_json(res).await;
    body["accessToken"]
        .as_str()
        .expect("token present")
        .to_owned()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn landmark_ownership_flow() {
    let app = fresh_app!();

    signup(&app, "alice", "alice@x.com", "pw123").await;
    signup(&app, "bob", "bob@x.com", "pw456").await;
    let alice_token = signin(&app, "alice", "pw123").await;
    let bob_token = signin(&app, "bob", "pw456").await;

    // Alice publishes a landmark; the owner comes from her token.
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .insert_header(bearer(&alice_token))
            .set_json(json!({
                "name": "Eiffel Tower",
                "description": "Wrought-iron lattice tower",
                "location": "Paris",
                "country": "France",
                "imageUrl": "https://example.com/eiffel.jpg",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), 201);
    let landmark: Value = test::read_body_json(created).await;
    let landmark_id = landmark["id"].as_i64().expect("landmark id");
    assert_eq!(landmark["userId"], 1);

    // Bob may read it but not rewrite it.
    let update = json!({
        "name": "Eiffel Tower",
        "description": "Actually mine now",
        "location": "Paris",
        "country": "France",
        "imageUrl": "https://example.com/eiffel.jpg",
    });
    let forbidden = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/landmarks/{landmark_id}"))
            .insert_header(bearer(&bob_token))
            .set_json(&update)
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), 403);

    // The record is unchanged after the rejected attempt.
    let unchanged = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/landmarks/{landmark_id}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(unchanged).await;
    assert_eq!(body["description"], "Wrought-iron lattice tower");

    // Alice's own update lands.
    let ok = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/landmarks/{landmark_id}"))
            .insert_header(bearer(&alice_token))
            .set_json(json!({
                "name": "Eiffel Tower",
                "description": "Icon of the 1889 Exposition Universelle",
                "location": "Paris",
                "country": "France",
                "imageUrl": "https://example.com/eiffel.jpg",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(ok.status(), 200);
    let body: Value = test::read_body_json(ok).await;
    assert_eq!(body["description"], "Icon of the 1889 Exposition Universelle");
    assert_eq!(body["userId"], 1);

    // Bob cannot delete it either; Alice can.
    let forbidden = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/landmarks/{landmark_id}"))
            .insert_header(bearer(&bob_token))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), 403);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/landmarks/{landmark_id}"))
            .insert_header(bearer(&alice_token))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), 204);

    let missing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/landmarks/{landmark_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), 404);
}

#[actix_web::test]
async fn mutations_require_a_valid_token() {
    let app = fresh_app!();
    let payload = json!({
        "name": "Big Ben",
        "description": "Clock tower",
        "location": "London",
        "country": "UK",
        "imageUrl": "https://example.com/bigben.jpg",
    });

    let no_token = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(no_token.status(), 401);

    let garbage = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .insert_header(bearer("not-a-token"))
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(garbage.status(), 401);

    // A structurally valid token signed with a different secret.
    signup(&app, "alice", "alice@x.com", "pw123").await;
    let foreign_signer = TokenSigner::new(
        b"some-other-secret-that-is-32-bytes-long".to_vec(),
        DEFAULT_TTL,
    )
    .expect("valid signer");
    let forged = foreign_signer.issue("alice").expect("token issues");
    let rejected = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .insert_header(bearer(&forged))
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(rejected.status(), 401);

    // Reads stay public.
    let list = test::call_service(
        &app,
        test::TestRequest::get().uri("/landmarks").to_request(),
    )
    .await;
    assert!(list.status().is_success());
}

#[actix_web::test]
async fn rating_scores_are_range_checked() {
    let app = fresh_app!();
    signup(&app, "alice", "alice@x.com", "pw123").await;
    let token = signin(&app, "alice", "pw123").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .insert_header(bearer(&token))
            .set_json(json!({
                "name": "Colosseum",
                "description": "Amphitheatre",
                "location": "Rome",
                "country": "Italy",
                "imageUrl": "https://example.com/colosseum.jpg",
            }))
            .to_request(),
    )
    .await;
    let landmark: Value = test::read_body_json(created).await;
    let landmark_id = landmark["id"].as_i64().expect("landmark id");

    for score in [0, 6, -3] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/ratings")
                .insert_header(bearer(&token))
                .set_json(json!({ "score": score, "landmarkId": landmark_id }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), 400, "score {score} must be rejected");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "score");
    }

    let mut rating_id = 0;
    for score in 1..=5 {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/ratings")
                .insert_header(bearer(&token))
                .set_json(json!({ "score": score, "landmarkId": landmark_id }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), 201, "score {score} must be accepted");
        let body: Value = test::read_body_json(res).await;
        rating_id = body["id"].as_i64().expect("rating id");
    }

    // Update is range checked too.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/ratings/{rating_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "score": 6, "landmarkId": landmark_id }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 400);

    // Rating a missing landmark is a first-class not-found.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/ratings")
            .insert_header(bearer(&token))
            .set_json(json!({ "score": 3, "landmarkId": 9999 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 404);
}

#[actix_web::test]
async fn deleting_a_user_cascades_over_http() {
    let app = fresh_app!();

    let alice: Value = signup(&app, "alice", "alice@x.com", "pw123").await;
    let alice_id = alice["id"].as_i64().expect("user id");
    signup(&app, "bob", "bob@x.com", "pw456").await;
    let alice_token = signin(&app, "alice", "pw123").await;
    let bob_token = signin(&app, "bob", "pw456").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .insert_header(bearer(&alice_token))
            .set_json(json!({
                "name": "Sagrada Familia",
                "description": "Basilica",
                "location": "Barcelona",
                "country": "Spain",
                "imageUrl": "https://example.com/sagrada.jpg",
            }))
            .to_request(),
    )
    .await;
    let landmark: Value = test::read_body_json(created).await;
    let landmark_id = landmark["id"].as_i64().expect("landmark id");

    let photo = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/photos")
            .insert_header(bearer(&alice_token))
            .set_json(json!({
                "imageUrl": "https://example.com/facade.jpg",
                "landmarkId": landmark_id,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(photo.status(), 201);

    // Bob rates Alice's landmark; the rating rides on her landmark.
    let rating = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/ratings")
            .insert_header(bearer(&bob_token))
            .set_json(json!({ "score": 5, "landmarkId": landmark_id }))
            .to_request(),
    )
    .await;
    assert_eq!(rating.status(), 201);

    // Bob cannot delete Alice's account.
    let forbidden = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/users/{alice_id}"))
            .insert_header(bearer(&bob_token))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), 403);

    // Alice deletes herself; everything she owned goes with her, and so do
    // ratings attached to her landmarks.
    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/users/{alice_id}"))
            .insert_header(bearer(&alice_token))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), 204);

    for uri in [
        format!("/landmarks/user/{alice_id}"),
        format!("/photos/user/{alice_id}"),
        format!("/ratings/user/{alice_id}"),
        format!("/ratings/landmark/{landmark_id}"),
    ] {
        let res =
            test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert!(res.status().is_success());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!([]), "{uri} should be empty after cascade");
    }

    // Alice's token no longer resolves to anyone.
    let unauthorized = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/landmarks")
            .insert_header(bearer(&alice_token))
            .set_json(json!({
                "name": "Ghost",
                "description": "d",
                "location": "l",
                "country": "c",
                "imageUrl": "u",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(unauthorized.status(), 401);

    // Bob is untouched.
    let bob_users = test::call_service(
        &app,
        test::TestRequest::get().uri("/users/username/bob").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(bob_users).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn photos_filter_by_user_and_landmark() {
    let app = fresh_app!();
    signup(&app, "alice", "alice@x.com", "pw123").await;
    let token = signin(&app, "alice", "pw123").await;

    let mut landmark_ids = Vec::new();
    for (name, country) in [("Louvre", "France"), ("Prado", "Spain")] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/landmarks")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "name": name,
                    "description": "Museum",
                    "location": "City",
                    "country": country,
                    "imageUrl": "https://example.com/m.jpg",
                }))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        landmark_ids.push(body["id"].as_i64().expect("landmark id"));
    }

    for landmark_id in &landmark_ids {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/photos")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "imageUrl": "https://example.com/p.jpg",
                    "landmarkId": landmark_id,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), 201);
    }

    let by_landmark = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/photos/landmark/{}", landmark_ids[0]))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(by_landmark).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let by_user = test::call_service(
        &app,
        test::TestRequest::get().uri("/photos/user/1").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(by_user).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let by_country = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/landmarks/country/France")
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(by_country).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Louvre");
}

#[actix_web::test]
async fn responses_carry_a_request_id() {
    let app = fresh_app!();
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/landmarks").to_request(),
    )
    .await;
    assert!(res.headers().contains_key("x-request-id"));

    // Error payloads echo the same id for correlation.
    let missing = test::call_service(
        &app,
        test::TestRequest::get().uri("/landmarks/999").to_request(),
    )
    .await;
    let header = missing
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("request id header");
    let body: Value = test::read_body_json(missing).await;
    assert_eq!(body["requestId"], Value::String(header));
}
