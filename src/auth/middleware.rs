// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorization gateway middleware.
//!
//! Every request routed through the wrapped service passes [`authorize`]:
//!
//! 1. `OPTIONS` preflights are forwarded unconditionally.
//! 2. The URL path is turned into selector form (`/Svc/Method` → `Svc.Method`).
//! 3. Anonymous paths are forwarded.
//! 4. Protected paths need `Authorization: Bearer <token>` with a valid
//!    signature. If set, `nbf` must not be in the future and `exp` must be.
//!    On success the [`Claims`] are inserted into the request extensions.
//! 5. Paths matching no rule are forwarded (fail-open).
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = services.layer(axum::middleware::from_fn_with_state(
//!     state.clone(),
//!     authorize,
//! ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::{policy::Access, selector::SEPARATOR, token, AuthError, Claims};
use crate::state::AppState;

/// Authorization scheme keyword, compared case-insensitively.
const BEARER: &str = "bearer";

/// Gateway middleware function.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let path = request.uri().path();
    let selector = selector_for_path(path);

    match state.policy.classify(&selector) {
        Access::Anonymous | Access::Unlisted => next.run(request).await,
        Access::Protected => match authenticate(request.headers(), path, &state) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
                next.run(request).await
            }
            Err(e) => {
                tracing::debug!(
                    path,
                    reason = e.error_code(),
                    "Rejected unauthenticated request"
                );
                StatusCode::UNAUTHORIZED.into_response()
            }
        },
    }
}

/// Validate the bearer token of a protected request.
fn authenticate(headers: &HeaderMap, path: &str, state: &AppState) -> Result<Claims, AuthError> {
    let token = bearer_token(headers)?;

    let claims = token::verify(token, &state.secret).map_err(|e| {
        tracing::warn!(
            token,
            path,
            reason = e.error_code(),
            "Error verifying bearer token"
        );
        e
    })?;

    let now = Utc::now();
    if !claims.is_active_at(now) {
        return Err(AuthError::TokenNotYetValid);
    }
    if !claims.is_live_at(now) {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Convert a URL path into selector form: the leading `/` is dropped and
/// the remaining `/` become `.`.
pub fn selector_for_path(path: &str) -> String {
    path.strip_prefix('/')
        .unwrap_or(path)
        .replace('/', &SEPARATOR.to_string())
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme keyword is matched case-insensitively and must be followed by
/// a single space.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (scheme, rest) = header
        .split_at_checked(BEARER.len())
        .ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case(BEARER) {
        return Err(AuthError::InvalidAuthHeader);
    }

    rest.strip_prefix(' ').ok_or(AuthError::InvalidAuthHeader)
}
