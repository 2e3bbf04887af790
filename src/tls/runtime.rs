//! The loaded TLS state of one gateway server.

use std::fmt;

use axum_server::tls_rustls::RustlsConfig;
use tokio_rustls::TlsAcceptor;

/// Loaded, immutable TLS runtime.
///
/// Owned by the gateway server that loaded it. `required` is only
/// meaningful while `enabled` is true; a disabled runtime never
/// carries a context.
#[derive(Debug)]
pub struct GatewayTlsRuntime {
    enabled: bool,
    required: bool,
    context: Option<TlsContext>,
}

impl GatewayTlsRuntime {
    /// Runtime for a gateway without TLS.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            required: false,
            context: None,
        }
    }

    pub(crate) fn enabled(required: bool, context: TlsContext) -> Self {
        Self {
            enabled: true,
            required,
            context: Some(context),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The constructed TLS context, present iff TLS is enabled.
    pub fn context(&self) -> Option<&TlsContext> {
        self.context.as_ref()
    }

    /// Acceptor for terminating TLS on accepted sockets.
    pub fn acceptor(&self) -> Option<TlsAcceptor> {
        self.context.as_ref().map(TlsContext::acceptor)
    }
}

/// Server-side TLS context built from the configured material.
#[derive(Clone)]
pub struct TlsContext {
    rustls: RustlsConfig,
    fingerprint_sha256: String,
    source: String,
    client_auth: bool,
}

impl TlsContext {
    pub(crate) fn new(
        rustls: RustlsConfig,
        fingerprint_sha256: String,
        source: String,
        client_auth: bool,
    ) -> Self {
        Self {
            rustls,
            fingerprint_sha256,
            source,
            client_auth,
        }
    }

    /// Handle usable with `axum_server::bind_rustls`.
    pub fn rustls_config(&self) -> &RustlsConfig {
        &self.rustls
    }

    pub fn acceptor(&self) -> TlsAcceptor {
        TlsAcceptor::from(self.rustls.get_inner())
    }

    /// SHA-256 fingerprint of the leaf certificate.
    pub fn fingerprint_sha256(&self) -> &str {
        &self.fingerprint_sha256
    }

    /// Where the certificate chain was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether client certificates are required and verified.
    pub fn client_auth(&self) -> bool {
        self.client_auth
    }
}

impl fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsContext")
            .field("fingerprint_sha256", &self.fingerprint_sha256)
            .field("source", &self.source)
            .field("client_auth", &self.client_auth)
            .finish_non_exhaustive()
    }
}
