//! Gateway server.
//!
//! # Responsibilities
//! - Run the accept loop on a bounded listener
//! - Apply connection admission before reading application data
//! - Terminate TLS with the loaded runtime's acceptor
//! - Serve HTTP/1.1 and HTTP/2 through an Axum router

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Extension, Json, Router};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::net::{
    admit, Admission, ConnectionGuard, ConnectionPermit, ConnectionTracker, Listener, ListenerError,
};
use crate::observability::metrics;
use crate::tls::GatewayTlsRuntime;

/// How long a peer may stay silent before it is classified as plaintext.
const FIRST_BYTE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long in-flight connections may run after shutdown is signalled.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS flags exposed to handlers.
#[derive(Debug, Clone, Copy)]
pub struct TlsStatus {
    pub enabled: bool,
    pub required: bool,
}

/// Per-connection facts injected into every request.
#[derive(Debug, Clone, Copy)]
pub struct PeerInfo {
    pub addr: SocketAddr,
    pub secure: bool,
}

/// The gateway server. Owns the TLS runtime it was started with.
pub struct GatewayServer {
    config: GatewayConfig,
    runtime: Arc<GatewayTlsRuntime>,
    router: Router,
    tracker: ConnectionTracker,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, runtime: GatewayTlsRuntime) -> Self {
        let status = TlsStatus {
            enabled: runtime.is_enabled(),
            required: runtime.is_required(),
        };

        Self {
            config,
            runtime: Arc::new(runtime),
            router: build_router(status),
            tracker: ConnectionTracker::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn runtime(&self) -> &GatewayTlsRuntime {
        &self.runtime
    }

    /// Handle for observing active connections.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept connections until the shutdown signal fires, then wait up to
    /// 30s for in-flight connections to finish.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        tracing::info!(
            address = ?listener.local_addr().ok(),
            tls_enabled = self.runtime.is_enabled(),
            tls_required = self.runtime.is_required(),
            "Gateway server starting"
        );

        loop {
            let (stream, peer, permit) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                        continue;
                    }
                    Err(e) => return Err(e),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
            };

            let guard = self.tracker.track();

            tokio::spawn(handle_connection(
                stream,
                peer,
                Arc::clone(&self.runtime),
                self.router.clone(),
                guard,
                permit,
            ));
        }

        drop(listener);
        let active = self.tracker.active_count();
        if active > 0 {
            tracing::info!(active, "Draining connections");
        }
        if !self.tracker.wait_for_shutdown(DRAIN_TIMEOUT).await {
            tracing::warn!(
                remaining = self.tracker.active_count(),
                "Drain timed out, abandoning connections"
            );
        }

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}

fn build_router(status: TlsStatus) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(status)
        .layer(TraceLayer::new_for_http())
}

async fn health(
    State(status): State<TlsStatus>,
    Extension(peer): Extension<PeerInfo>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "tls": status.enabled,
        "tls_required": status.required,
        "secure": peer.secure,
    }))
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    runtime: Arc<GatewayTlsRuntime>,
    router: Router,
    guard: ConnectionGuard,
    _permit: ConnectionPermit,
) {
    let id = guard.id();
    let first_byte = peek_first_byte(&stream).await;
    let admission = admit(&runtime, peer, first_byte);
    metrics::record_admission(admission);

    tracing::debug!(connection_id = %id, peer_addr = %peer, %admission, "Connection admitted");

    match admission {
        // Counted by `gateway_connections_total`; logged at debug since
        // remote peers control how often this happens.
        Admission::Reject => {
            tracing::debug!(
                connection_id = %id,
                peer_addr = %peer,
                "Rejected plaintext connection: TLS is required"
            );
        }
        Admission::Plaintext => {
            serve(stream, router, PeerInfo { addr: peer, secure: false }).await
        }
        Admission::Tls => {
            let Some(acceptor) = runtime.acceptor() else {
                return;
            };
            match acceptor.accept(stream).await {
                Ok(tls_stream) => {
                    serve(tls_stream, router, PeerInfo { addr: peer, secure: true }).await
                }
                Err(e) => {
                    metrics::record_handshake_failure();
                    tracing::debug!(
                        connection_id = %id,
                        peer_addr = %peer,
                        error = %e,
                        "TLS handshake failed"
                    );
                }
            }
        }
    }
}

/// Look at the first byte without consuming it.
async fn peek_first_byte(stream: &TcpStream) -> Option<u8> {
    let mut buf = [0u8; 1];
    match tokio::time::timeout(FIRST_BYTE_TIMEOUT, stream.peek(&mut buf)).await {
        Ok(Ok(n)) if n > 0 => Some(buf[0]),
        _ => None,
    }
}

async fn serve<I>(io: I, router: Router, peer: PeerInfo)
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let service = TowerToHyperService::new(router.layer(Extension(peer)));
    let builder = auto::Builder::new(TokioExecutor::new());

    if let Err(e) = builder.serve_connection(TokioIo::new(io), service).await {
        tracing::debug!(peer_addr = %peer.addr, error = %e, "Connection ended with error");
    }
}
