//! Process configuration for the echotel server.
//!
//! Every knob is a command-line flag with an `ECHOTEL_`-prefixed environment
//! variable fallback (uppercased, hyphens to underscores). Explicit flags win
//! over the environment, the environment wins over the built-in defaults.

use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "echotel-server", version, about = "Traced example RPC services")]
pub struct Settings {
    /// Address and port the server listens on
    #[arg(long, env = "ECHOTEL_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// OTLP collector endpoint, e.g. http://localhost:4317.
    /// When unset, spans go to a stdout exporter instead.
    #[arg(long, env = "ECHOTEL_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Use plaintext transport for the OTLP exporter
    #[arg(
        long,
        env = "ECHOTEL_OTLP_INSECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub otlp_insecure: bool,

    /// Timeout for OTLP export calls in seconds
    #[arg(long, env = "ECHOTEL_OTLP_TIMEOUT_SECS", default_value_t = 5)]
    pub otlp_timeout_secs: u64,

    /// Service name attached to every emitted span
    #[arg(long, env = "ECHOTEL_SERVICE_NAME", default_value = "echotel-server")]
    pub service_name: String,

    /// Service version attached to every emitted span
    #[arg(
        long,
        env = "ECHOTEL_SERVICE_VERSION",
        default_value = env!("CARGO_PKG_VERSION")
    )]
    pub service_version: String,

    /// Log verbosity when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, env = "ECHOTEL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format: json or text
    #[arg(long, env = "ECHOTEL_LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// How long to wait for in-flight requests during drain, in seconds
    #[arg(long, env = "ECHOTEL_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

impl Settings {
    pub fn otlp_timeout(&self) -> Duration {
        Duration::from_secs(self.otlp_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
