pub mod config;
pub mod error;
pub mod greet_service;
pub mod ping_service;
pub mod router;
pub mod server;
pub mod status_service;
pub mod telemetry;
pub mod tracing_utils;

pub use router::{AppState, build_router};
pub use server::Server;
