// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    http::{header::HeaderName, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::middleware::authorize, state::AppState};

pub mod health;
pub mod session;

/// Largest accepted request body (32 MiB).
pub const MAX_REQUEST_LENGTH: usize = 32 * 1024 * 1024;

/// Longest time a request may take before it is answered with 408 (5 minutes).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const CORS_ALLOW_HEADERS: [&str; 8] = [
    "accept-encoding",
    "authorization",
    "content-type",
    "grpc-timeout",
    "grpc-encoding",
    "grpc-accept-encoding",
    "x-grpc-web",
    "x-user-agent",
];

const CORS_EXPOSE_HEADERS: [&str; 5] = [
    "content-encoding",
    "grpc-status",
    "grpc-message",
    "grpc-encoding",
    "grpc-accept-encoding",
];

/// Built-in RPC services served behind the gateway.
pub fn services() -> Router {
    Router::new().route("/Session/WhoAmI", post(session::whoami))
}

/// Compose the full application.
///
/// `services` is wrapped with the authorization gateway. Health and docs
/// routes stay outside it. The remaining stages run in this order for every
/// request: request id, tracing, request id propagation, CORS, timeout, body
/// limit.
pub fn router(state: AppState, services: Router) -> Router {
    router_with_timeout(state, services, REQUEST_TIMEOUT)
}

/// Like [`router`], with a custom request timeout.
pub fn router_with_timeout(state: AppState, services: Router, timeout: Duration) -> Router {
    let gated = services.layer(from_fn_with_state(state.clone(), authorize));

    let mut app = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .with_state(state.clone())
        .merge(gated);

    if !state.environment.is_production() {
        app = app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(cors_layer())
            .layer(timeout_layer(timeout))
            .layer(DefaultBodyLimit::max(MAX_REQUEST_LENGTH)),
    )
}

// `TimeoutLayer::new` answers with 408 Request Timeout.
#[allow(deprecated)]
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::new(timeout)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(CORS_ALLOW_HEADERS.map(HeaderName::from_static))
        .expose_headers(CORS_EXPOSE_HEADERS.map(HeaderName::from_static))
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health::root, health::health, session::whoami),
    components(schemas(health::ReadyResponse, health::HealthChecks, session::WhoAmIResponse)),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Session", description = "Caller identity")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{token, AuthPolicy, SigningSecret};
    use crate::config::Environment;
    use crate::service_config::ServiceConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const API_CONFIG: &str = r#"
type: google.api.Service
authentication:
  rules:
    - selector: Session.*
      requirements:
        - providerId: maritima
"#;

    fn state() -> AppState {
        let config = ServiceConfig::from_yaml(API_CONFIG).unwrap();
        AppState::new(
            AuthPolicy::from_service_config(&config, "maritima"),
            SigningSecret::new("router-test-key"),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn root_is_outside_gateway() {
        let app = router(state(), services());
        let (status, body) = send(app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn whoami_requires_token() {
        let app = router(state(), services());
        let request = Request::post("/Session/WhoAmI").body(Body::empty()).unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn whoami_echoes_claims() {
        let state = state();
        let Value::Object(claims) = json!({"sub": "user_123"}) else {
            unreachable!()
        };
        let bearer = token::issue(claims, &state.secret).unwrap();

        let app = router(state, services());
        let request = Request::post("/Session/WhoAmI")
            .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["claims"]["sub"], "user_123");
        assert!(body["claims"]["iat"].is_i64());
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(state(), services());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn slow_requests_time_out() {
        async fn slow() -> &'static str {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        }

        let services = Router::new().route("/Slow/Call", post(slow));
        let app = router_with_timeout(state(), services, Duration::from_millis(20));
        let request = Request::post("/Slow/Call").body(Body::empty()).unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn fast_requests_finish_within_timeout() {
        let app = router_with_timeout(state(), services(), Duration::from_secs(5));
        let (status, body) = send(app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[test]
    fn default_timeout_is_five_minutes() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn docs_are_hidden_in_production() {
        let app = router(state().with_environment(Environment::Production), services());
        let request = Request::get("/api-doc/openapi.json").body(Body::empty()).unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let app = router(state(), services());
        let request = Request::get("/api-doc/openapi.json").body(Body::empty()).unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}
