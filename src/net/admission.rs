//! Connection admission.
//!
//! Decides, before any application bytes are read, whether a connection
//! may proceed. Plaintext is refused only when TLS is both enabled and
//! required, and even then loopback peers are let through for local
//! diagnostics.

use std::fmt;
use std::net::SocketAddr;

use crate::tls::GatewayTlsRuntime;

/// Peer addresses exempt from the TLS requirement.
///
/// Matched by exact string equality. Other spellings of loopback
/// (`127.0.0.2`, `[::1]`, `::1%lo`) are deliberately not recognized.
pub const LOOPBACK_ADDRESSES: [&str; 4] = ["127.0.0.1", "::1", "::ffff:127.0.0.1", "localhost"];

/// First byte of a TLS handshake record.
pub const TLS_HANDSHAKE_RECORD: u8 = 0x16;

/// Whether a plaintext connection from `remote_addr` must be rejected.
///
/// An absent address is treated as the empty string, which is not loopback.
pub fn should_reject_non_tls_connection(
    tls_enabled: bool,
    tls_required: bool,
    remote_addr: Option<&str>,
) -> bool {
    if !tls_enabled || !tls_required {
        return false;
    }
    let addr = remote_addr.unwrap_or("");
    !LOOPBACK_ADDRESSES.contains(&addr)
}

/// How the server handles one accepted socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Terminate TLS, then serve.
    Tls,
    /// Serve without TLS.
    Plaintext,
    /// Close without forwarding any data.
    Reject,
}

impl Admission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::Tls => "tls",
            Admission::Plaintext => "plaintext",
            Admission::Reject => "rejected",
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a connection from its peer address and first (peeked) byte.
///
/// `None` means the peer sent nothing before closing or timing out; that is
/// treated like plaintext.
pub fn admit(runtime: &GatewayTlsRuntime, peer: SocketAddr, first_byte: Option<u8>) -> Admission {
    if runtime.is_enabled() && first_byte == Some(TLS_HANDSHAKE_RECORD) {
        return Admission::Tls;
    }

    let remote = peer.ip().to_string();
    let (enabled, required) = (runtime.is_enabled(), runtime.is_required());
    if should_reject_non_tls_connection(enabled, required, Some(&remote)) {
        Admission::Reject
    } else {
        Admission::Plaintext
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTHERS: [Option<&str>; 7] = [
        None,
        Some(""),
        Some("203.0.113.5"),
        Some("127.0.0.2"),
        Some("[::1]"),
        Some("::ffff:7f00:1"),
        Some("LOCALHOST"),
    ];

    #[test]
    fn never_rejects_when_tls_disabled() {
        for required in [false, true] {
            for addr in OTHERS {
                assert!(!should_reject_non_tls_connection(false, required, addr));
            }
        }
    }

    #[test]
    fn never_rejects_when_tls_optional() {
        for enabled in [false, true] {
            for addr in OTHERS {
                assert!(!should_reject_non_tls_connection(enabled, false, addr));
            }
        }
    }

    #[test]
    fn loopback_allowlist_is_exempt() {
        for addr in LOOPBACK_ADDRESSES {
            assert!(!should_reject_non_tls_connection(true, true, Some(addr)));
        }
    }

    #[test]
    fn everything_else_is_rejected_when_required() {
        for addr in OTHERS {
            assert!(should_reject_non_tls_connection(true, true, addr), "{addr:?}");
        }
    }

    #[test]
    fn decision_is_stable() {
        let first = should_reject_non_tls_connection(true, true, Some("198.51.100.7"));
        let second = should_reject_non_tls_connection(true, true, Some("198.51.100.7"));
        assert_eq!(first, second);
    }

    #[test]
    fn socket_addr_rendering_hits_allowlist() {
        let v4: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let v6: SocketAddr = "[::1]:4000".parse().unwrap();
        let mapped: SocketAddr = "[::ffff:127.0.0.1]:4000".parse().unwrap();
        for peer in [v4, v6, mapped] {
            assert!(LOOPBACK_ADDRESSES.contains(&peer.ip().to_string().as_str()), "{peer}");
        }
    }

    #[test]
    fn disabled_runtime_serves_plaintext() {
        let runtime = GatewayTlsRuntime::disabled();
        let remote: SocketAddr = "203.0.113.5:5000".parse().unwrap();
        assert_eq!(admit(&runtime, remote, Some(b'G')), Admission::Plaintext);
        // A handshake to a plaintext gateway is not ours to terminate.
        assert_eq!(admit(&runtime, remote, Some(TLS_HANDSHAKE_RECORD)), Admission::Plaintext);
    }
}
