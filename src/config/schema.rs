//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:18789").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Optional TLS configuration. Absent means TLS is disabled.
    pub tls: Option<GatewayTlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:18789".to_string(),
            max_connections: 1024,
            tls: None,
        }
    }
}

/// TLS configuration for the gateway listener.
///
/// Each piece of key material is referenced either by path or by inline PEM
/// content. Which one is set is checked by validation and again by the loader.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayTlsConfig {
    /// Terminate TLS on the gateway listener.
    pub enabled: bool,

    /// Reject plaintext connections from non-loopback peers.
    pub required: bool,

    /// Path to the certificate chain (PEM).
    pub cert_path: Option<PathBuf>,

    /// Inline certificate chain (PEM).
    pub cert_pem: Option<String>,

    /// Path to the private key (PEM).
    pub key_path: Option<PathBuf>,

    /// Inline private key (PEM).
    pub key_pem: Option<String>,

    /// Trust store used to verify client certificates (mutual TLS).
    pub ca_path: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
