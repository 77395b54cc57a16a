//! Greet procedure: returns a greeting for the supplied name.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use echotel_api::greet::v1::{GreetRequest, GreetResponse, SERVICE_NAME};
use http::HeaderMap;
use opentelemetry::KeyValue;
use opentelemetry::trace::{Span, SpanKind, Status, Tracer, TracerProvider as _};
use tracing::info;

use crate::error::RpcError;
use crate::router::AppState;
use crate::telemetry::{TRACER_NAME, extract_context};
use crate::tracing_utils::extract_or_generate_correlation_id;

fn greeting_for(name: &str) -> String {
    format!("Hello, {name}!")
}

pub async fn greet(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GreetRequest>, JsonRejection>,
) -> Result<Json<GreetResponse>, RpcError> {
    let correlation_id = extract_or_generate_correlation_id(&headers);

    let parent_cx = extract_context(&headers);
    let tracer = state.tracer_provider.tracer(TRACER_NAME);
    let mut span = tracer
        .span_builder(format!("{SERVICE_NAME}/Greet"))
        .with_kind(SpanKind::Server)
        .start_with_context(&tracer, &parent_cx);
    span.set_attribute(KeyValue::new("rpc.service", SERVICE_NAME));
    span.set_attribute(KeyValue::new("rpc.method", "Greet"));

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let err = RpcError::invalid_argument(format!("malformed request body: {rejection}"));
            span.set_status(Status::error(err.message.clone()));
            span.end();
            return Err(err);
        }
    };
    span.set_attribute(KeyValue::new("greet.name", req.name.clone()));

    info!(correlation_id = %correlation_id, name = %req.name, "received greet request");

    // An empty name is greeted verbatim, not defaulted.
    let message = greeting_for(&req.name);

    span.set_status(Status::Ok);
    span.end();

    info!(correlation_id = %correlation_id, message = %message, "sending greet response");

    Ok(Json(GreetResponse { message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::build_router;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use tower::ServiceExt;

    // The provider is returned so tests keep it alive: dropping the last
    // provider clone shuts down the pipeline, which clears the in-memory
    // exporter's recorded spans.
    fn traced_router() -> (axum::Router, InMemorySpanExporter, SdkTracerProvider) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (
            build_router(AppState::new(provider.clone())),
            exporter,
            provider,
        )
    }

    async fn greet_message(router: axum::Router, name: &str) -> String {
        let body = serde_json::to_string(&GreetRequest {
            name: name.to_string(),
        })
        .unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(echotel_api::greet::v1::GREET_PROCEDURE)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let reply: GreetResponse = serde_json::from_slice(&bytes).unwrap();
        reply.message
    }

    #[test]
    fn greeting_is_formatted_verbatim() {
        assert_eq!(greeting_for("World"), "Hello, World!");
        assert_eq!(greeting_for(""), "Hello, !");
        assert_eq!(greeting_for("世界"), "Hello, 世界!");
    }

    #[tokio::test]
    async fn greet_with_name() {
        let (router, exporter, _provider) = traced_router();
        assert_eq!(greet_message(router, "World").await, "Hello, World!");

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, format!("{SERVICE_NAME}/Greet"));
        assert!(matches!(spans[0].status, Status::Ok));
    }

    #[tokio::test]
    async fn greet_with_empty_name() {
        let (router, _exporter, _provider) = traced_router();
        assert_eq!(greet_message(router, "").await, "Hello, !");
    }

    #[tokio::test]
    async fn handler_span_joins_the_propagated_trace() {
        let (router, exporter, _provider) = traced_router();
        crate::telemetry::init_propagator();

        let traceparent = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(echotel_api::greet::v1::GREET_PROCEDURE)
                    .header("content-type", "application/json")
                    .header("traceparent", traceparent)
                    .body(Body::from(r#"{"name":"World"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans[0].span_context.trace_id().to_string(),
            "0af7651916cd43dd8448eb211c80319c"
        );
    }
}
