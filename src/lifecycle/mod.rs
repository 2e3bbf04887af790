//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Load TLS runtime → Bind listener → Build server
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → Stop accepting → Drain in-flight connections (30s cap)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: TLS first, listeners last (traffic only when ready)
//! - Fail fast: any startup error is fatal

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, Started, StartupError};
