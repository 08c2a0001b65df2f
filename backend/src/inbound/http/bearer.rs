//! Bearer-token extraction from the `Authorization` header.
//!
//! Handlers take a [`BearerToken`] parameter and exchange it for a principal
//! via the auth service; the raw header never reaches business logic.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::domain::Error;

/// The raw token presented with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Token string without the `Bearer ` prefix.
    pub fn token(&self) -> &str {
        self.0.as_str()
    }
}

fn extract(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must use the bearer scheme"))?;

    Ok(BearerToken(token.to_owned()))
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn extract_from(header: Option<&'static str>) -> Result<BearerToken, Error> {
        let req = match header {
            Some(value) => TestRequest::default()
                .insert_header(("Authorization", value))
                .to_http_request(),
            None => TestRequest::default().to_http_request(),
        };
        extract(&req)
    }

    #[test]
    fn extracts_bearer_token() {
        let token = extract_from(Some("Bearer abc.def.ghi")).expect("token extracted");
        assert_eq!(token.token(), "abc.def.ghi");
    }

    #[rstest]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer "))]
    #[case(Some("abc"))]
    #[case(None)]
    fn rejects_missing_or_non_bearer(#[case] header: Option<&'static str>) {
        let err = extract_from(header).expect_err("must reject");
        assert_eq!(err.code, crate::domain::ErrorCode::Unauthorized);
    }
}
