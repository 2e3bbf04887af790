//! Startup orchestration.
//!
//! Order: TLS runtime, then listener, then server. No socket is bound
//! (and so no connection accepted) before the TLS load has finished.
//! Any error here is fatal.

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::http::GatewayServer;
use crate::net::{Listener, ListenerError};
use crate::observability::GatewayLog;
use crate::tls::{load_gateway_tls_runtime, TlsLoadError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Tls(#[from] TlsLoadError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// A gateway with its TLS runtime loaded and its listener bound.
pub struct Started {
    pub server: GatewayServer,
    pub listener: Listener,
}

pub async fn start(config: GatewayConfig, log: &dyn GatewayLog) -> Result<Started, StartupError> {
    let runtime = load_gateway_tls_runtime(config.listener.tls.as_ref(), log).await?;

    if let Some(context) = runtime.context() {
        tracing::info!(
            source = context.source(),
            fingerprint_sha256 = context.fingerprint_sha256(),
            required = runtime.is_required(),
            client_auth = context.client_auth(),
            "TLS runtime loaded"
        );
    } else {
        tracing::info!("TLS disabled");
    }

    let listener = Listener::bind(&config.listener).await?;
    let server = GatewayServer::new(config, runtime);

    Ok(Started { server, listener })
}
