//! Plain HTTP surface: health check and a traced example endpoint.

use axum::Json;
use axum::extract::{MatchedPath, State};
use http::{HeaderMap, Method};
use opentelemetry::trace::{Span, SpanKind, Status, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::KeyValue;
use serde::Serialize;
use tracing::info;

use crate::router::AppState;
use crate::telemetry::{TRACER_NAME, extract_context};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ExampleResponse {
    pub message: &'static str,
}

pub async fn health(
    State(state): State<AppState>,
    method: Method,
    path: MatchedPath,
    headers: HeaderMap,
) -> Json<HealthResponse> {
    let parent_cx = extract_context(&headers);
    let tracer = state.tracer_provider.tracer(TRACER_NAME);
    let mut span = tracer
        .span_builder("health_check")
        .with_kind(SpanKind::Server)
        .start_with_context(&tracer, &parent_cx);
    span.set_attribute(KeyValue::new("http.method", method.to_string()));
    span.set_attribute(KeyValue::new("http.path", path.as_str().to_string()));

    info!(method = %method, path = path.as_str(), "health check called");

    span.set_status(Status::Ok);
    span.end();

    Json(HealthResponse { status: "ok" })
}

/// Demonstrates nested child spans under one request span.
pub async fn example(
    State(state): State<AppState>,
    method: Method,
    path: MatchedPath,
    headers: HeaderMap,
) -> Json<ExampleResponse> {
    let parent_cx = extract_context(&headers);
    let tracer = state.tracer_provider.tracer(TRACER_NAME);
    let mut span = tracer
        .span_builder("example_operation")
        .with_kind(SpanKind::Server)
        .start_with_context(&tracer, &parent_cx);
    span.set_attribute(KeyValue::new("http.method", method.to_string()));
    span.set_attribute(KeyValue::new("http.path", path.as_str().to_string()));

    let cx = parent_cx.with_span(span);

    let mut child = tracer.start_with_context("process_data", &cx);
    child.set_attribute(KeyValue::new("operation", "data_processing"));
    child.end();

    let mut child = tracer.start_with_context("validate_data", &cx);
    child.set_attribute(KeyValue::new("operation", "data_validation"));
    child.end();

    info!("example operation completed");

    cx.span().set_status(Status::Ok);
    cx.span().end();

    Json(ExampleResponse {
        message: "example operation completed",
    })
}
