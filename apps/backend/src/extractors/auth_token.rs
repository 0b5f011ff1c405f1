use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::debug;

use crate::error::AppError;

/// Opaque bearer credential from `Authorization: Bearer <token>`.
///
/// Whether it is a player access token or a game admin credential is up to
/// the handler; this extractor only checks that one is present. A missing
/// or malformed header is `401`, an unknown token is `403` further down.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(|t| BearerToken(t.to_string()));

        ready(token.ok_or_else(|| {
            debug!(path = %req.path(), "missing or malformed bearer token");
            AppError::unauthorized()
        }))
    }
}
