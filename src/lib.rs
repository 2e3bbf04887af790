//! Gateway TLS bootstrap and connection admission.
//!
//! Loads the TLS runtime for a network-facing gateway and decides, per
//! connection, whether plaintext must be refused.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod tls;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use net::should_reject_non_tls_connection;
pub use tls::{load_gateway_tls_runtime, GatewayTlsRuntime, TlsLoadError};
