//! Gateway with TLS termination and connection admission.
//!
//! ```text
//!     Client ──▶ listener ──▶ admission ──┬─▶ TLS handshake ──▶ HTTP
//!                                         ├─▶ plaintext ──────▶ HTTP
//!                                         └─▶ close (TLS required)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use gateway_tls::config::{load_config, GatewayConfig};
use gateway_tls::lifecycle::{self, Shutdown};
use gateway_tls::observability::{self, TracingLog};

#[derive(Parser)]
#[command(name = "gateway-tls")]
#[command(
    about = "Network gateway with TLS termination and plaintext admission control",
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    observability::init_tracing(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gateway-tls starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let started = lifecycle::start(config, &TracingLog).await?;

    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    tokio::spawn(async move { signal.trigger_on_signal().await });

    started
        .server
        .run(started.listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
