// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::auth::Auth;

/// Claims attached to the current request.
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    #[schema(value_type = Object)]
    pub claims: Map<String, Value>,
}

/// Echo the caller's verified claims.
///
/// Only reachable with claims when `Session.WhoAmI` is protected by the
/// API config; otherwise the extractor rejects with 401.
#[utoipa::path(
    post,
    path = "/Session/WhoAmI",
    tag = "Session",
    responses(
        (status = 200, description = "Verified claims", body = WhoAmIResponse),
        (status = 401, description = "No valid bearer token")
    ),
    security(("bearer" = []))
)]
pub async fn whoami(Auth(claims): Auth) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        claims: claims.into_map(),
    })
}
