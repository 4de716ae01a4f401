// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Signing secret status ("ok" or "missing").
    pub signing_secret: String,
    /// Number of compiled anonymous-access selectors.
    pub anonymous_selectors: usize,
    /// Number of compiled protected selectors.
    pub protected_selectors: usize,
}

/// Plain liveness probe.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = String))
)]
pub async fn root() -> &'static str {
    "OK"
}

/// Health check endpoint handler.
///
/// Returns 503 when no signing secret is configured, since protected
/// methods cannot be reached then.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let secret_ok = !state.secret.is_empty();

    let response = ReadyResponse {
        status: if secret_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            signing_secret: if secret_ok { "ok" } else { "missing" }.to_string(),
            anonymous_selectors: state.policy.allow_anonymous().len(),
            protected_selectors: state.policy.require_auth().len(),
        },
    };

    let status = if secret_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
