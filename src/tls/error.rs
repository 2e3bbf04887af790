use thiserror::Error;

/// Failure to produce a TLS runtime. Always fatal to starting the TLS listener.
#[derive(Debug, Error)]
pub enum TlsLoadError {
    /// TLS is enabled but the configuration cannot name its key material.
    #[error("TLS configuration error: {reason}")]
    Config { reason: String },

    /// Key material was referenced but could not be read or used.
    #[error("TLS material error ({reference}): {reason}")]
    Material { reference: String, reason: String },
}

impl TlsLoadError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn material(reference: impl ToString, reason: impl Into<String>) -> Self {
        Self::Material {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    pub fn is_material(&self) -> bool {
        matches!(self, Self::Material { .. })
    }
}
