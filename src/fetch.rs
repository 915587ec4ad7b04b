//! Parallel retrieval of source payloads.

use futures::{stream, StreamExt};
use log::debug;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;

/// Per-source fetch outcome: the source URL with either its trimmed body or
/// the reason it produced nothing.
pub type FetchOutcome = (String, Result<String, FetchError>);

/// Fetch every source with at most `concurrency` requests in flight.
///
/// The per-request timeout lives on `client`; a straggler only costs its own
/// slot. There are no retries — any failure marks the source failed for this
/// run. Results arrive in completion order, which is deliberately not the
/// submission order.
pub async fn fetch_all(
    client: &Client,
    sources: &[String],
    concurrency: usize,
) -> Vec<FetchOutcome> {
    stream::iter(sources.to_vec())
        .map(|url| {
            let client = client.clone();
            async move {
                let outcome = fetch_one(&client, &url).await;
                (url, outcome)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

async fn fetch_one(client: &Client, url: &str) -> Result<String, FetchError> {
    debug!("fetching {url}");
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status));
    }
    let body = response.text().await?;
    Ok(body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a fresh local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}/list.txt")
    }

    fn client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn ok_response_yields_trimmed_body() {
        let url = serve_once("HTTP/1.1 200 OK", "  vless://u@h:443#x\n").await;
        let results = fetch_all(&client(), &[url.clone()], 10).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, url);
        assert_eq!(results[0].1.as_deref().ok(), Some("vless://u@h:443#x"));
    }

    #[tokio::test]
    async fn non_200_status_is_an_explicit_failure() {
        let url = serve_once("HTTP/1.1 404 Not Found", "gone").await;
        let results = fetch_all(&client(), &[url], 10).await;
        match &results[0].1 {
            Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_failure() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/list.txt");
        let results = fetch_all(&client(), &[url], 10).await;
        assert!(matches!(results[0].1, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn sibling_failures_do_not_poison_the_batch() {
        let good = serve_once("HTTP/1.1 200 OK", "trojan://p@h:443").await;
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let dead = format!("http://127.0.0.1:{port}/x");

        let results = fetch_all(&client(), &[good.clone(), dead.clone()], 2).await;
        assert_eq!(results.len(), 2);
        let ok = results.iter().find(|(url, _)| *url == good).unwrap();
        let failed = results.iter().find(|(url, _)| *url == dead).unwrap();
        assert_eq!(ok.1.as_deref().ok(), Some("trojan://p@h:443"));
        assert!(failed.1.is_err());
    }
}
