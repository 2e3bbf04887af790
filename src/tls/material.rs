//! Key material acquisition.
//!
//! Material is referenced either by a file path or by inline PEM text. Files
//! are read with `tokio::fs`, so a load abandoned mid-way releases its handle
//! once the in-flight read finishes.

use std::fmt;
use std::path::Path;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::RootCertStore;
use sha2::{Digest, Sha256};

use crate::tls::error::TlsLoadError;

/// Where one piece of key material comes from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MaterialRef<'a> {
    Path(&'a Path),
    Inline { field: &'static str, pem: &'a str },
}

impl<'a> MaterialRef<'a> {
    /// Pick the single configured reference out of a path/inline pair.
    pub(crate) fn resolve(
        path_field: &'static str,
        pem_field: &'static str,
        path: Option<&'a Path>,
        pem: Option<&'a str>,
    ) -> Result<Self, TlsLoadError> {
        match (path, pem) {
            (Some(path), None) => Ok(Self::Path(path)),
            (None, Some(pem)) => Ok(Self::Inline {
                field: pem_field,
                pem,
            }),
            (None, None) => Err(TlsLoadError::config(format!(
                "TLS is enabled but neither {path_field} nor {pem_field} is configured"
            ))),
            (Some(_), Some(_)) => Err(TlsLoadError::config(format!(
                "both {path_field} and {pem_field} are configured; set exactly one"
            ))),
        }
    }

    async fn read(&self) -> Result<Vec<u8>, TlsLoadError> {
        match self {
            Self::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| TlsLoadError::material(self, format!("unreadable: {e}"))),
            Self::Inline { pem, .. } => Ok(pem.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for MaterialRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Inline { field, .. } => write!(f, "inline {field}"),
        }
    }
}

/// Read a PEM certificate chain. The first certificate is the leaf.
pub(crate) async fn load_certificates(
    source: &MaterialRef<'_>,
) -> Result<Vec<CertificateDer<'static>>, TlsLoadError> {
    let bytes = source.read().await?;
    let mut reader = bytes.as_slice();

    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsLoadError::material(source, format!("malformed PEM: {e}")))?;

    if certs.is_empty() {
        return Err(TlsLoadError::material(source, "no PEM certificates found"));
    }
    Ok(certs)
}

/// Read the first private key (PKCS#8, PKCS#1 or SEC1) from PEM.
pub(crate) async fn load_private_key(
    source: &MaterialRef<'_>,
) -> Result<PrivateKeyDer<'static>, TlsLoadError> {
    let bytes = source.read().await?;
    let mut reader = bytes.as_slice();

    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| TlsLoadError::material(source, format!("malformed PEM: {e}")))?
        .ok_or_else(|| TlsLoadError::material(source, "no private key found"))
}

/// Build a trust store for client certificate verification.
pub(crate) async fn load_trust_store(path: &Path) -> Result<RootCertStore, TlsLoadError> {
    let source = MaterialRef::Path(path);
    let certs = load_certificates(&source).await?;

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(TlsLoadError::material(
            source,
            format!("trust store holds no usable CA certificates ({ignored} ignored)"),
        ));
    }
    Ok(roots)
}

/// SHA-256 over the DER encoding, as colon separated uppercase hex.
pub fn fingerprint_sha256(cert: &CertificateDer<'_>) -> String {
    Sha256::digest(cert.as_ref())
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}
