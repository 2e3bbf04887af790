//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (connection limits, socket addresses)
//! - Detect ambiguous TLS material references
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Missing TLS material is not checked here; the TLS loader reports it

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, GatewayTlsConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field}: {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnections,

    #[error("listener.tls: both {path_field} and {pem_field} are set")]
    AmbiguousMaterial {
        path_field: &'static str,
        pem_field: &'static str,
    },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Some(tls) = &config.listener.tls {
        validate_tls(tls, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_tls(tls: &GatewayTlsConfig, errors: &mut Vec<ValidationError>) {
    if tls.cert_path.is_some() && tls.cert_pem.is_some() {
        errors.push(ValidationError::AmbiguousMaterial {
            path_field: "cert_path",
            pem_field: "cert_pem",
        });
    }
    if tls.key_path.is_some() && tls.key_pem.is_some() {
        errors.push(ValidationError::AmbiguousMaterial {
            path_field: "key_path",
            pem_field: "key_pem",
        });
    }
}
