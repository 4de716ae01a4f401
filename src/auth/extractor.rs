// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the claims attached by the gateway.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims were verified by the gateway middleware
//! }
//! ```
//!
//! The extractors never verify tokens themselves. Claims are only present
//! when the request went through [`authorize`](super::middleware::authorize)
//! on a protected path.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims};

/// Extractor for verified claims.
///
/// Rejects with a bare 401 when no claims are attached.
pub struct Auth(pub Claims);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Optional claims extractor.
///
/// Yields `None` on anonymous and unlisted paths.
pub struct OptionalAuth(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Claims>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use serde_json::{json, Value};

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn claims() -> Claims {
        let Value::Object(map) = json!({"sub": "user_from_middleware", "iat": 0}) else {
            unreachable!()
        };
        Claims::from_map(map).unwrap()
    }

    #[tokio::test]
    async fn auth_reads_extensions() {
        let mut parts = parts();
        parts.extensions.insert(claims());

        let Auth(found) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.subject(), Some("user_from_middleware"));
    }

    #[tokio::test]
    async fn auth_without_claims_is_unauthorized() {
        let mut parts = parts();

        let Err(rejection) = Auth::from_request_parts(&mut parts, &()).await else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn optional_auth_returns_none_without_claims() {
        let mut parts = parts();

        let OptionalAuth(found) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(found.is_none());

        parts.extensions.insert(claims());
        let OptionalAuth(found) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, Some(claims()));
    }
}
