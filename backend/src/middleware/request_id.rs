//! Middleware attaching a request-scoped correlation identifier.
//!
//! Each incoming request receives a UUID request id held in tokio task-local
//! storage. Handlers and error constructors read it via
//! [`RequestId::current`], and every response carries it back in an
//! `x-request-id` header.
//!
//! Task-local values are not inherited by spawned tasks; wrap spawned work in
//! [`RequestId::scope`] when the identifier must propagate.

use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::future::Future;
use tokio::task_local;
use tracing::warn;
use uuid::Uuid;

/// Response header carrying the correlation identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

task_local! {
    static REQUEST_ID: RequestId;
}

/// Per-request correlation identifier exposed via task-local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the current request identifier if one is in scope.
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(|id| *id).ok()
    }

    /// Run the provided future with the supplied identifier in scope.
    pub async fn scope<Fut>(id: RequestId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(id, fut).await
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Middleware generating a request id per call and echoing it in the
/// response headers.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use landmark_api::middleware::request_id::Correlate;
///
/// let app = App::new().wrap(Correlate);
/// ```
#[derive(Clone)]
pub struct Correlate;

impl<S, B> Transform<S, ServiceRequest> for Correlate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelateMiddleware { service }))
    }
}

/// Service wrapper produced by [`Correlate`]; not used directly.
pub struct CorrelateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::generate();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );
        let fut = self.service.call(req);
        Box::pin(RequestId::scope(request_id, async move {
            let _entered = span.enter();
            let mut res = fut.await?;
            match HeaderValue::from_str(&request_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Err(error) => {
                    warn!(%error, %request_id, "failed to encode request id header");
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = RequestId::generate();
        let observed = RequestId::scope(expected, async move { RequestId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(RequestId::current().is_none());
    }

    #[actix_web::test]
    async fn adds_request_id_header() {
        let app = test::init_service(
            App::new()
                .wrap(Correlate)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[actix_web::test]
    async fn exposes_request_id_in_handler() {
        let app = test::init_service(App::new().wrap(Correlate).route(
            "/",
            web::get().to(|| async move {
                let id = RequestId::current().expect("request id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("header present")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), &body[..]);
    }
}
