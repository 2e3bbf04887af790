//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary
//! - Provide the optional logging capability handed to the TLS loader
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level from config, overridable via `RUST_LOG`
//! - An absent logger is a [`NoopLog`], never an `Option` checked at call sites

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging capability consumed by bootstrap code.
///
/// Both methods default to doing nothing, so an implementation only
/// overrides the levels it cares about.
pub trait GatewayLog: Send + Sync {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

/// The absent logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl GatewayLog for NoopLog {}

/// Forwards messages to `tracing` under the `gateway::tls` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl GatewayLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "gateway::tls", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "gateway::tls", "{}", message);
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let fallback = format!("gateway_tls={default_level},gateway={default_level},tower_http=info");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
