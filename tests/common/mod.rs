//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gateway_tls::config::{GatewayConfig, GatewayTlsConfig};
use gateway_tls::lifecycle::{self, Shutdown};
use gateway_tls::observability::NoopLog;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream};
use tokio_rustls::TlsConnector;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// TLS config backed by the fixture certificate and key.
pub fn tls_config(required: bool) -> GatewayTlsConfig {
    GatewayTlsConfig {
        enabled: true,
        required,
        cert_path: Some(fixture("server.pem")),
        key_path: Some(fixture("server.key")),
        ..Default::default()
    }
}

/// Start a gateway on an ephemeral loopback port.
pub async fn spawn_gateway(tls: Option<GatewayTlsConfig>) -> (SocketAddr, Shutdown) {
    spawn_gateway_on("127.0.0.1:0", tls).await
}

/// Start a gateway on an ephemeral port of the given local address.
pub async fn spawn_gateway_on(
    bind_address: &str,
    tls: Option<GatewayTlsConfig>,
) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = bind_address.into();
    config.listener.tls = tls;

    let started = lifecycle::start(config, &NoopLog).await.expect("gateway start");
    let addr = started.listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = started.server.run(started.listener, rx).await;
    });

    (addr, shutdown)
}

fn read_certs(name: &str) -> Vec<CertificateDer<'static>> {
    let mut reader = BufReader::new(File::open(fixture(name)).unwrap());
    rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn read_key(name: &str) -> PrivateKeyDer<'static> {
    let mut reader = BufReader::new(File::open(fixture(name)).unwrap());
    rustls_pemfile::private_key(&mut reader).unwrap().unwrap()
}

/// TLS client trusting the fixture CA, optionally presenting the fixture cert.
pub fn tls_connector(with_client_cert: bool) -> TlsConnector {
    let mut roots = RootCertStore::empty();
    for cert in read_certs("ca.pem") {
        roots.add(cert).unwrap();
    }

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let builder = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_root_certificates(roots);

    let config = if with_client_cert {
        builder
            .with_client_auth_cert(read_certs("server.pem"), read_key("server.key"))
            .unwrap()
    } else {
        builder.with_no_client_auth()
    };

    TlsConnector::from(Arc::new(config))
}

/// Issue `GET /health` over TLS and return whatever came back.
pub async fn tls_get_health(addr: SocketAddr, connector: &TlsConnector) -> String {
    let tcp = TcpStream::connect(addr).await.unwrap();
    tls_get_health_over(tcp, connector).await
}

/// Same as [`tls_get_health`] over an already connected socket.
pub async fn tls_get_health_over(tcp: TcpStream, connector: &TlsConnector) -> String {
    let domain = ServerName::try_from("localhost").unwrap();
    match connector.connect(domain, tcp).await {
        Ok(stream) => get_health(stream).await,
        Err(_) => String::new(),
    }
}

/// Issue `GET /health` over plain TCP and return whatever came back.
pub async fn plain_get_health(addr: SocketAddr) -> String {
    let tcp = TcpStream::connect(addr).await.unwrap();
    get_health(tcp).await
}

/// Same as [`plain_get_health`] over an already connected socket.
pub async fn plain_get_health_over(tcp: TcpStream) -> String {
    get_health(tcp).await
}

/// Connect to `addr` from a specific local IP, so the gateway sees that peer.
pub async fn connect_from(local_ip: IpAddr, addr: SocketAddr) -> TcpStream {
    let socket = match local_ip {
        IpAddr::V4(_) => TcpSocket::new_v4().unwrap(),
        IpAddr::V6(_) => TcpSocket::new_v6().unwrap(),
    };
    socket.bind(SocketAddr::new(local_ip, 0)).unwrap();
    socket.connect(addr).await.unwrap()
}

async fn get_health<S>(mut stream: S) -> String
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = "GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    if stream.write_all(request.as_bytes()).await.is_err() {
        return String::new();
    }

    let mut response = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match tokio::time::timeout(Duration::from_secs(5), stream.read(&mut chunk)).await {
            Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
            Ok(Ok(n)) => response.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&response).into_owned()
}
