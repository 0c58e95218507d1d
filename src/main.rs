//! ascii-live server binary
//!
//! ```text
//! PORT=8080 ascii-live
//! curl localhost:8080/spinner
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use ascii_live::registry::FrameRegistry;
use ascii_live::{FrameServer, ServerConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Stream animated ASCII art to curl
#[derive(Debug, Parser)]
#[command(name = "ascii-live", version, about)]
struct Cli {
    /// Port to listen on (required)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// URL of a JSON frame catalog to load and refresh from
    #[arg(long, env = "FRAMES_URL")]
    frames_url: Option<String>,

    /// Path of a JSON frame catalog, used when no URL is given
    #[arg(long, env = "FRAMES_FILE")]
    frames_file: Option<PathBuf>,

    /// Timeout for fetching the frame catalog URL, in seconds
    #[arg(long, env = "FRAMES_TIMEOUT_SECS", default_value_t = 10)]
    frames_timeout_secs: u64,

    /// User-agent substring that identifies an accepted client
    #[arg(long, env = "CLIENT_SIGNATURE", default_value = "curl")]
    client_signature: String,
}

impl Cli {
    fn into_config(self) -> ascii_live::Result<ServerConfig> {
        let mut config = ServerConfig::from_port(self.port)?
            .host(self.host)
            .client_signature(self.client_signature)
            .fetch_timeout(Duration::from_secs(self.frames_timeout_secs));

        if let Some(url) = self.frames_url {
            config = config.frames_url(url);
        }
        if let Some(path) = self.frames_file {
            config = config.frames_file(path);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Refusing to start");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> ascii_live::Result<()> {
    let source = config.frame_source()?;
    let registry = Arc::new(FrameRegistry::load(source).await);

    tracing::info!(
        source = %registry.source().describe(),
        sequences = registry.len(),
        "Frames loaded"
    );

    FrameServer::new(config, registry)
        .run_until(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl+c");
        std::future::pending::<()>().await;
    }
}
