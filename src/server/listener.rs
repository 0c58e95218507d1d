//! Frame server listener
//!
//! Binds the TCP listener and serves the router until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::registry::FrameRegistry;
use crate::server::classifier::ClientClassifier;
use crate::server::config::ServerConfig;
use crate::server::routes::{self, AppState};
use crate::stats::ServerStats;

/// HTTP server streaming frame sequences
pub struct FrameServer {
    config: ServerConfig,
    state: AppState,
}

impl FrameServer {
    /// Create a new server with the given configuration and registry
    pub fn new(config: ServerConfig, registry: Arc<FrameRegistry>) -> Self {
        let classifier = ClientClassifier::new(config.client_signature.clone());
        Self {
            config,
            state: AppState::new(registry, classifier),
        }
    }

    /// Get a reference to the frame registry
    pub fn registry(&self) -> &Arc<FrameRegistry> {
        &self.state.registry
    }

    /// Server-wide counters
    pub fn stats(&self) -> &Arc<ServerStats> {
        &self.state.stats
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router, e.g. to mount it elsewhere
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    ///
    /// When `shutdown` completes every live stream is cancelled, and the call
    /// returns once their connections have closed.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Bind and serve in the background
    pub async fn start(self) -> Result<ServerHandle> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        let shutdown = self.state.shutdown.clone();
        let signal = shutdown.clone().cancelled_owned();

        let task = tokio::spawn(async move {
            if let Err(e) = self.serve(listener, signal).await {
                tracing::error!(error = %e, "Frame server failed");
            }
        });

        Ok(ServerHandle {
            local_addr,
            shutdown,
            task,
        })
    }

    async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            addr = %listener.local_addr()?,
            sequences = self.state.registry.len(),
            "Serving frames"
        );

        let sessions = self.state.shutdown.clone();
        let signal = async move {
            shutdown.await;
            tracing::info!("Shutdown signal received");
            sessions.cancel();
        };

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await?;

        let stats = self.state.stats.snapshot();
        tracing::info!(
            sessions = stats.sessions_started,
            frames_sent = stats.frames_sent,
            bytes_sent = stats.bytes_sent,
            uptime_secs = stats.uptime.as_secs(),
            "Frame server stopped"
        );

        Ok(())
    }
}

/// Handle to a server started with [`FrameServer::start`]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Begin graceful shutdown
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait for the server task to finish
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Frame server task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use super::*;
    use crate::registry::{BuiltinSource, Catalog, Sequence};
    use crate::server::response::{NOT_CURLED_MESSAGE, NOT_FOUND_MESSAGE};
    use crate::session::CLEAR_SCREEN;

    fn make_server() -> FrameServer {
        let catalog = Catalog::new().with(
            "validName",
            Sequence::from_static(&["<frame 0>", "<frame 1>"], Duration::from_millis(10)),
        );
        let registry = FrameRegistry::with_catalog(catalog, Arc::new(BuiltinSource));
        let config = ServerConfig::default().host(IpAddr::V4(Ipv4Addr::LOCALHOST));

        FrameServer::new(config, Arc::new(registry))
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().build().unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let handle = make_server().start().await.unwrap();
        let base = format!("http://{}", handle.local_addr());

        // Listing
        let resp = client().get(format!("{base}/list")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "frames": ["validName"] }));

        // Unknown sequence
        let resp = client()
            .get(format!("{base}/nonexistent"))
            .header("User-Agent", "curl/8.0")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);

        // Browser
        let resp = client()
            .get(format!("{base}/validName"))
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 417);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], NOT_CURLED_MESSAGE);

        // curl gets a chunked stream starting with a clear and frame 0
        let mut resp = client()
            .get(format!("{base}/validName"))
            .header("User-Agent", "curl/8.0")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["transfer-encoding"], "chunked");

        let mut received = Vec::new();
        let expected = format!("{CLEAR_SCREEN}<frame 0>\n");
        while received.len() < expected.len() {
            let chunk = resp.chunk().await.unwrap().unwrap();
            received.extend_from_slice(&chunk);
        }
        assert!(received.starts_with(expected.as_bytes()));
        drop(resp);

        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), handle.stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_with_live_stream() {
        let server = make_server();
        let stats = Arc::clone(server.stats());
        let handle = server.start().await.unwrap();

        let mut resp = client()
            .get(format!("http://{}/validName", handle.local_addr()))
            .header("User-Agent", "curl/7.64.1")
            .send()
            .await
            .unwrap();
        resp.chunk().await.unwrap().unwrap();
        assert_eq!(stats.active_sessions(), 1);

        // Infinite streams must not hold up shutdown
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), handle.stopped())
            .await
            .unwrap();

        assert_eq!(stats.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_client_disconnect_ends_session() {
        let server = make_server();
        let stats = Arc::clone(server.stats());
        let handle = server.start().await.unwrap();

        let mut resp = client()
            .get(format!("http://{}/validName", handle.local_addr()))
            .header("User-Agent", "curl/8.0")
            .send()
            .await
            .unwrap();
        resp.chunk().await.unwrap().unwrap();
        drop(resp);

        tokio::time::timeout(Duration::from_secs(5), async {
            while stats.active_sessions() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_run_until_stops() {
        let server = make_server();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            server
                .run_until(async {
                    let _ = rx.await;
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
