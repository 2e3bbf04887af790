//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! admitted TCP/TLS connection
//!     → server.rs (hyper auto: HTTP/1.1 or HTTP/2)
//!     → Axum router (/health)
//!     → Send to client
//! ```

pub mod server;

pub use server::{GatewayServer, PeerInfo, TlsStatus};
