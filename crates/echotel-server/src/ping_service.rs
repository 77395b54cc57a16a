//! Ping procedure: echoes the request message.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::AppendHeaders;
use echotel_api::ping::v1::{PingRequest, PingResponse, SERVICE_NAME};
use http::HeaderMap;
use opentelemetry::KeyValue;
use opentelemetry::trace::{Span, SpanKind, Status, Tracer, TracerProvider as _};
use tracing::info;

use crate::error::RpcError;
use crate::router::AppState;
use crate::telemetry::{TRACER_NAME, extract_context};
use crate::tracing_utils::extract_or_generate_correlation_id;

/// Reply used when the caller sends an empty message.
pub const DEFAULT_REPLY: &str = "pong";

pub const HANDLED_DURATION_HEADER: &str = "x-handled-duration";

fn reply_for(message: &str) -> String {
    if message.is_empty() {
        DEFAULT_REPLY.to_string()
    } else {
        message.to_string()
    }
}

pub async fn ping(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PingRequest>, JsonRejection>,
) -> Result<(AppendHeaders<[(&'static str, String); 1]>, Json<PingResponse>), RpcError> {
    let start = Instant::now();
    let correlation_id = extract_or_generate_correlation_id(&headers);

    let parent_cx = extract_context(&headers);
    let tracer = state.tracer_provider.tracer(TRACER_NAME);
    let mut span = tracer
        .span_builder(format!("{SERVICE_NAME}/Ping"))
        .with_kind(SpanKind::Server)
        .start_with_context(&tracer, &parent_cx);
    span.set_attribute(KeyValue::new("rpc.service", SERVICE_NAME));
    span.set_attribute(KeyValue::new("rpc.method", "Ping"));

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let err = RpcError::invalid_argument(format!("malformed request body: {rejection}"));
            span.set_status(Status::error(err.message.clone()));
            span.end();
            return Err(err);
        }
    };
    span.set_attribute(KeyValue::new("ping.message", req.message.clone()));

    let message = reply_for(&req.message);

    span.set_status(Status::Ok);
    span.end();

    let elapsed = start.elapsed();
    info!(
        correlation_id = %correlation_id,
        message = %req.message,
        duration_ms = elapsed.as_millis() as u64,
        "handled ping"
    );

    Ok((
        AppendHeaders([(HANDLED_DURATION_HEADER, format!("{}ms", elapsed.as_millis()))]),
        Json(PingResponse { message }),
    ))
}
