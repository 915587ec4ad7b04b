//! TCP liveness probing.

use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::time;

use crate::parse::Endpoint;

/// Outcome of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Liveness {
    /// Whether the endpoint accepted a TCP connection within the timeout.
    pub reachable: bool,
    /// Wall-clock connect latency in seconds, when it did.
    pub latency: Option<f64>,
}

impl Liveness {
    fn unreachable() -> Self {
        Self {
            reachable: false,
            latency: None,
        }
    }
}

/// Probe `endpoint` with a raw TCP connect bounded by `timeout`.
///
/// Connect errors and timeouts both read as unreachable; this never fails.
/// A successful connect says nothing about the protocol behind the port —
/// it is a reachability signal only.
pub async fn probe(endpoint: &Endpoint, timeout: Duration) -> Liveness {
    let addr = format!("{}:{}", endpoint.host, endpoint.port);
    let start = Instant::now();
    match time::timeout(timeout, TcpStream::connect(&addr)).await {
        Ok(Ok(_stream)) => Liveness {
            reachable: true,
            latency: Some(start.elapsed().as_secs_f64()),
        },
        _ => Liveness::unreachable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn local_listener_is_reachable_with_latency() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Endpoint {
            host: "127.0.0.1".to_string(),
            port: listener.local_addr().unwrap().port(),
        };

        let result = probe(&endpoint, Duration::from_secs(2)).await;
        assert!(result.reachable);
        let latency = result.latency.unwrap();
        assert!(latency >= 0.0 && latency < 2.0);
    }

    #[tokio::test]
    async fn closed_port_reads_as_unreachable() {
        // Grab a free port, then release it before probing.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint = Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        };

        let result = probe(&endpoint, Duration::from_secs(2)).await;
        assert!(!result.reachable);
        assert_eq!(result.latency, None);
    }

    #[tokio::test]
    async fn unresolvable_host_reads_as_unreachable() {
        let endpoint = Endpoint {
            host: "no-such-host.invalid".to_string(),
            port: 443,
        };
        let result = probe(&endpoint, Duration::from_secs(2)).await;
        assert!(!result.reachable);
    }
}
