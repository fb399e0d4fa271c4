// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{NonceResponse, VerifyRequest, VerifyResponse},
    state::AppState,
};

pub mod client_ip;
pub mod health;
pub mod nonce;
pub mod verify;

/// Build the application router.
///
/// `cors_allowed_origins` restricts cross-origin callers; empty allows any.
pub fn router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/api/nonce", get(nonce::issue_nonce))
        .route("/api/verify", post(verify::verify_signature))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(cors_layer(cors_allowed_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        nonce::issue_nonce,
        verify::verify_signature
    ),
    components(
        schemas(
            NonceResponse,
            VerifyRequest,
            VerifyResponse,
            health::HealthResponse,
            health::LivenessResponse
        )
    ),
    tags(
        (name = "Verification", description = "Nonce issuance and wallet ownership verification"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
