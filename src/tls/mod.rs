//! TLS runtime loading.
//!
//! # Data Flow
//! ```text
//! listener.tls (GatewayTlsConfig, may be absent)
//!     → absent / disabled ─────────────────────────→ GatewayTlsRuntime::disabled()
//!     → material.rs (resolve refs, read PEM, trust store)
//!     → rustls ServerConfig (+ client verifier when ca_path is set)
//!     → GatewayTlsRuntime { enabled, required, TlsContext }
//! ```
//!
//! # Design Decisions
//! - Errors propagate to startup; a broken config never degrades to plaintext
//! - Every call builds an independent context, nothing global is mutated
//! - The crypto provider is passed explicitly rather than installed process-wide

pub mod error;
pub mod material;
pub mod runtime;

use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};

use crate::config::GatewayTlsConfig;
use crate::observability::GatewayLog;

pub use error::TlsLoadError;
pub use material::fingerprint_sha256;
pub use runtime::{GatewayTlsRuntime, TlsContext};

use material::MaterialRef;

/// ALPN protocols offered by the gateway listener.
const ALPN_PROTOCOLS: [&[u8]; 2] = [b"h2", b"http/1.1"];

/// Load the TLS runtime for one gateway server.
///
/// An absent or disabled config yields [`GatewayTlsRuntime::disabled`] and
/// cannot fail. Otherwise the configured material is read and validated.
pub async fn load_gateway_tls_runtime(
    cfg: Option<&GatewayTlsConfig>,
    log: &dyn GatewayLog,
) -> Result<GatewayTlsRuntime, TlsLoadError> {
    let Some(cfg) = cfg.filter(|cfg| cfg.enabled) else {
        return Ok(GatewayTlsRuntime::disabled());
    };

    let cert_ref = MaterialRef::resolve(
        "cert_path",
        "cert_pem",
        cfg.cert_path.as_deref(),
        cfg.cert_pem.as_deref(),
    )?;
    let key_ref = MaterialRef::resolve(
        "key_path",
        "key_pem",
        cfg.key_path.as_deref(),
        cfg.key_pem.as_deref(),
    )?;

    let certs = material::load_certificates(&cert_ref).await?;
    let key = material::load_private_key(&key_ref).await?;
    let client_roots = match cfg.ca_path.as_deref() {
        Some(path) => Some((material::load_trust_store(path).await?, path)),
        None => None,
    };

    let fingerprint = fingerprint_sha256(&certs[0]);
    let client_auth = client_roots.is_some();
    let server_config = build_server_config(certs, key, client_roots, &cert_ref, &key_ref)?;

    log.info(&format!("gateway TLS enabled (required={})", cfg.required));
    log.info(&format!("TLS material loaded from {cert_ref}"));
    log.info(&format!("TLS certificate fingerprint sha256={fingerprint}"));
    if client_auth {
        log.info("TLS client certificates required (mutual TLS)");
    }
    if !cfg.required {
        log.warn("TLS is enabled but not required; plaintext connections are still accepted");
    }

    let context = TlsContext::new(
        RustlsConfig::from_config(Arc::new(server_config)),
        fingerprint,
        cert_ref.to_string(),
        client_auth,
    );
    Ok(GatewayTlsRuntime::enabled(cfg.required, context))
}

fn build_server_config(
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
    client_roots: Option<(RootCertStore, &Path)>,
    cert_ref: &MaterialRef<'_>,
    key_ref: &MaterialRef<'_>,
) -> Result<ServerConfig, TlsLoadError> {
    let provider: Arc<CryptoProvider> = Arc::new(rustls::crypto::aws_lc_rs::default_provider());

    let builder = ServerConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| TlsLoadError::material(cert_ref, e.to_string()))?;

    let builder = match client_roots {
        Some((roots, ca_path)) => {
            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
                .build()
                .map_err(|e| {
                    TlsLoadError::material(ca_path.display(), format!("unusable trust store: {e}"))
                })?;
            builder.with_client_cert_verifier(verifier)
        }
        None => builder.with_no_client_auth(),
    };

    let mut config = builder.with_single_cert(certs, key).map_err(|e| {
        TlsLoadError::material(key_ref, format!("rejected with certificate {cert_ref}: {e}"))
    })?;

    config.alpn_protocols = ALPN_PROTOCOLS.iter().map(|p| p.to_vec()).collect();
    Ok(config)
}
