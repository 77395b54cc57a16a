//! Server lifecycle: bind, serve, drain, stop.
//!
//! The accept loop and the signal waiter are the only coordinating tasks,
//! joined by a shared cancellation token. Once the token fires, no new
//! request is dispatched and in-flight requests get a bounded drain window.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::pin::pin;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::ServerError;

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub async fn bind(addr: &str, router: Router) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Serve)
    }

    /// Serve until `shutdown` fires, then drain within `drain_timeout`.
    ///
    /// Requests accepted before the signal are allowed to finish; a drain
    /// that overruns the deadline is reported as an error, not retried.
    pub async fn serve(
        self,
        shutdown: CancellationToken,
        drain_timeout: Duration,
    ) -> Result<(), ServerError> {
        let drain_trigger = shutdown.clone();
        let serve = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move { drain_trigger.cancelled().await })
            .into_future();
        let mut serve = pin!(serve);

        tokio::select! {
            res = &mut serve => res.map_err(ServerError::Serve),
            () = shutdown.cancelled() => {
                info!(timeout_secs = drain_timeout.as_secs(), "draining in-flight requests");
                match tokio::time::timeout(drain_timeout, &mut serve).await {
                    Ok(res) => res.map_err(ServerError::Serve),
                    Err(_) => Err(ServerError::DrainTimeout(drain_timeout)),
                }
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM.
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install interrupt handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn idle_router() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn bind_fails_on_malformed_address() {
        let result = Server::bind("not-an-address", idle_router()).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn serve_stops_cleanly_when_nothing_is_in_flight() {
        let server = Server::bind("127.0.0.1:0", idle_router()).await.unwrap();
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(server.serve(shutdown.clone(), Duration::from_secs(5)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("drain finishes well within the deadline")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn drain_overrun_is_reported_as_an_error() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "done"
            }),
        );
        let server = Server::bind("127.0.0.1:0", router).await.unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(server.serve(shutdown.clone(), Duration::from_millis(200)));

        let in_flight = tokio::spawn(async move {
            let _ = reqwest::get(format!("http://{addr}/slow")).await;
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ServerError::DrainTimeout(_))));
        in_flight.abort();
    }
}
