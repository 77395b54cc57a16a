use anyhow::Context;
use clap::Parser;
use echotel_server::config::Settings;
use echotel_server::router::{AppState, build_router};
use echotel_server::server::{Server, wait_for_shutdown_signal};
use echotel_server::telemetry::{self, TelemetryGuard};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let settings = Settings::parse();
    telemetry::init_logging(&settings);

    if let Err(e) = run(settings).await {
        error!(error = %format!("{e:#}"), "server exited with error");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    telemetry::init_propagator();
    let provider = telemetry::build_tracer_provider(&settings)
        .context("failed to initialize tracer provider")?;
    let guard = TelemetryGuard::new(provider.clone());

    info!(
        addr = %settings.listen_addr,
        service_name = %settings.service_name,
        service_version = %settings.service_version,
        otlp_endpoint = settings.otlp_endpoint.as_deref().unwrap_or("(stdout)"),
        "starting server"
    );

    let router = build_router(AppState::new(provider));
    let server = Server::bind(&settings.listen_addr, router).await?;
    info!(addr = %server.local_addr()?, "listening");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received");
        signal_token.cancel();
    });

    let serve_result = server.serve(shutdown, settings.shutdown_timeout()).await;

    // Flush spans regardless of how draining went, on an independent deadline.
    // Telemetry is best-effort: a failed flush is logged, not fatal.
    if let Err(e) = guard.shutdown(settings.otlp_timeout()).await {
        error!(error = %format!("{e:#}"), "failed to shutdown tracer provider");
    }

    serve_result?;
    info!("server exited cleanly");
    Ok(())
}
