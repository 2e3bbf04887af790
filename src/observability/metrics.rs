//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_connections_total` (counter): accepted/rejected connections by `outcome`
//! - `gateway_tls_handshake_failures_total` (counter): failed TLS handshakes
//! - `gateway_active_connections` (gauge): current connection count

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::net::admission::Admission;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Count one admission decision.
pub fn record_admission(admission: Admission) {
    metrics::counter!("gateway_connections_total", "outcome" => admission.as_str()).increment(1);
}

pub fn record_handshake_failure() {
    metrics::counter!("gateway_tls_handshake_failures_total").increment(1);
}

pub fn set_active_connections(count: u64) {
    metrics::gauge!("gateway_active_connections").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admissions_are_counted_by_outcome() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_admission(Admission::Reject);
            record_admission(Admission::Reject);
            record_admission(Admission::Plaintext);
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"gateway_connections_total{outcome="rejected"} 2"#));
        assert!(rendered.contains(r#"gateway_connections_total{outcome="plaintext"} 1"#));
        assert!(!rendered.contains(r#"outcome="tls""#));
    }

    #[test]
    fn handshake_failures_and_active_gauge() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_handshake_failure();
            set_active_connections(3);
        });

        let rendered = handle.render();
        assert!(rendered.contains("gateway_tls_handshake_failures_total 1"));
        assert!(rendered.contains("gateway_active_connections 3"));
    }
}
