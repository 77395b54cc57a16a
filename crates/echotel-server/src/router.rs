//! Router wiring for all service endpoints.

use axum::Router;
use axum::routing::{get, post};
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::{greet_service, ping_service, status_service};

/// Read-only state shared by every request handler.
///
/// The tracer provider is injected explicitly rather than looked up through
/// process-global registration; it is cheap to clone and safe to share across
/// concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub tracer_provider: SdkTracerProvider,
}

impl AppState {
    pub fn new(tracer_provider: SdkTracerProvider) -> Self {
        Self { tracer_provider }
    }
}

/// Build the router exposing the RPC procedures and the plain HTTP surface.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            echotel_api::ping::v1::PING_PROCEDURE,
            post(ping_service::ping),
        )
        .route(
            echotel_api::greet::v1::GREET_PROCEDURE,
            post(greet_service::greet),
        )
        .route("/health", get(status_service::health))
        .route("/example", get(status_service::example))
        .with_state(state)
}
