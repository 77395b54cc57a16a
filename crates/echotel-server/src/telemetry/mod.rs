//! Telemetry for the echotel server.
//!
//! Provides OpenTelemetry-based observability:
//! - Tracer provider with OTLP export (stdout fallback when no collector
//!   is configured)
//! - W3C Trace Context + Baggage propagation over HTTP headers
//! - tracing-subscriber based structured logging

mod init;
mod propagation;

pub use init::{TelemetryGuard, build_tracer_provider, init_logging, init_propagator};
pub use propagation::{extract_context, inject_context};

/// Instrumentation scope name for spans created by this server.
pub const TRACER_NAME: &str = "echotel-server";
