//! Telemetry initialization.
//!
//! One canonical tracer configuration: an OTLP/gRPC exporter behind a
//! batching processor when a collector endpoint is configured, a stdout
//! exporter behind a simple processor otherwise. Sampling is always-on and
//! the resource carries the service identity.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use opentelemetry_semantic_conventions::resource::{HOST_NAME, SERVICE_VERSION};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Settings;

/// Guard that owns the tracer provider for the process lifetime.
///
/// Shut it down explicitly with [`TelemetryGuard::shutdown`] to flush with a
/// bounded deadline; dropping it without doing so falls back to a best-effort
/// synchronous shutdown.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn new(tracer_provider: SdkTracerProvider) -> Self {
        Self {
            tracer_provider: Some(tracer_provider),
        }
    }

    /// Flush buffered spans and close the exporter, bounded by `deadline`.
    ///
    /// A deadline overrun is reported as an error but the provider is
    /// considered consumed either way; shutdown happens at most once.
    pub async fn shutdown(mut self, deadline: Duration) -> anyhow::Result<()> {
        let Some(provider) = self.tracer_provider.take() else {
            return Ok(());
        };

        let flush = tokio::task::spawn_blocking(move || provider.shutdown());
        match tokio::time::timeout(deadline, flush).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(anyhow::anyhow!("tracer provider shutdown failed: {e}")),
            Ok(Err(e)) => Err(anyhow::anyhow!("tracer provider shutdown task panicked: {e}")),
            Err(_) => Err(anyhow::anyhow!(
                "tracer provider shutdown exceeded deadline of {deadline:?}"
            )),
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown tracer provider: {:?}", e);
        }
    }
}

/// Initialize the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured log level. Call once per
/// process.
pub fn init_logging(settings: &Settings) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    match settings.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .init();
        }
    }
}

/// Install the W3C Trace Context + Baggage composite propagator globally.
pub fn init_propagator() {
    let propagator = TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]);
    global::set_text_map_propagator(propagator);
}

/// Build the tracer provider described by `settings`.
///
/// Fails without partial registration when the exporter cannot be built; the
/// caller decides whether to abort startup.
pub fn build_tracer_provider(settings: &Settings) -> anyhow::Result<SdkTracerProvider> {
    let mut resource = Resource::builder()
        .with_service_name(settings.service_name.clone())
        .with_attribute(KeyValue::new(
            SERVICE_VERSION,
            settings.service_version.clone(),
        ));
    if let Ok(host) = std::env::var("HOSTNAME")
        && !host.is_empty()
    {
        resource = resource.with_attribute(KeyValue::new(HOST_NAME, host));
    }
    let resource = resource.build();

    let builder = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::AlwaysOn);

    let provider = match &settings.otlp_endpoint {
        Some(endpoint) => {
            let endpoint = normalize_endpoint(endpoint, settings.otlp_insecure);
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .with_timeout(settings.otlp_timeout())
                .build()?;
            builder.with_batch_exporter(exporter).build()
        }
        None => {
            let exporter = opentelemetry_stdout::SpanExporter::default();
            builder.with_simple_exporter(exporter).build()
        }
    };

    Ok(provider)
}

/// The tonic exporter requires a URI with a scheme; bare host:port endpoints
/// get one matching the configured transport security mode.
fn normalize_endpoint(endpoint: &str, insecure: bool) -> String {
    if endpoint.contains("://") {
        return endpoint.to_string();
    }
    if insecure {
        format!("http://{endpoint}")
    } else {
        format!("https://{endpoint}")
    }
}
