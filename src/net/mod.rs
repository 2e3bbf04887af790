//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → peek first byte (nothing consumed)
//!     → admission.rs (TLS / plaintext / reject)
//!     → TLS handshake when the peer speaks TLS
//!     → connection.rs (id, active count)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Admission runs before any application data is read
//! - The loopback exemption is a fixed string allowlist

pub mod admission;
pub mod connection;
pub mod listener;

pub use admission::{admit, should_reject_non_tls_connection, Admission, LOOPBACK_ADDRESSES};
pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{ConnectionPermit, Listener, ListenerError};
