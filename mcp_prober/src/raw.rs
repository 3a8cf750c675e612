//! Plain TCP exchanges that show the HTTP traffic byte for byte.
//!
//! Requests are written as literal text and responses are read until the peer
//! closes or the step's timeout runs out, whichever comes first.

use crate::envelope::JsonRpcRequest;
use crate::error::{ProberError, Result};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::debug;

const READ_CHUNK: usize = 4096;

/// Bytes received during one raw exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExchange {
    pub bytes: Vec<u8>,
    /// The peer was still connected when the timeout ran out.
    pub timed_out: bool,
}

impl RawExchange {
    /// Received bytes as text, with undecodable sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

pub fn stream_request_text(target: &str, path: &str) -> String {
    format!(
        "GET {path} HTTP/1.1\r\n\
         Host: {target}\r\n\
         Accept: text/event-stream\r\n\
         Cache-Control: no-cache\r\n\
         Connection: keep-alive\r\n\
         \r\n"
    )
}

pub fn rpc_request_text(target: &str, path: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {target}\r\n\
         Content-Type: application/json\r\n\
         Accept: application/json, text/event-stream\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    )
}

/// Opens the event stream by hand and collects whatever the server sends.
pub async fn stream_probe(target: &str, path: &str, limit: Duration) -> Result<RawExchange> {
    exchange(target, &stream_request_text(target, path), limit).await
}

/// Sends one JSON-RPC request as literal HTTP text.
pub async fn raw_rpc_call(
    target: &str,
    path: &str,
    request: &JsonRpcRequest,
    limit: Duration,
) -> Result<RawExchange> {
    let body = serde_json::to_string(request)?;
    exchange(target, &rpc_request_text(target, path, &body), limit).await
}

async fn exchange(target: &str, request_text: &str, limit: Duration) -> Result<RawExchange> {
    let mut stream = timeout(limit, TcpStream::connect(target))
        .await
        .map_err(|_| ProberError::Timeout(limit))??;
    debug!(peer = %target, "Raw connection established");

    stream.write_all(request_text.as_bytes()).await?;
    stream.flush().await?;

    let deadline = Instant::now() + limit;
    let mut received = RawExchange::default();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match timeout_at(deadline, stream.read(&mut chunk)).await {
            Err(_) if received.bytes.is_empty() => return Err(ProberError::Timeout(limit)),
            Err(_) => {
                received.timed_out = true;
                break;
            }
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => received.bytes.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => return Err(e.into()),
        }
    }

    debug!(
        peer = %target,
        bytes = received.bytes.len(),
        timed_out = received.timed_out,
        "Raw exchange finished"
    );
    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;
    use tokio::net::TcpListener;

    /// Accepts one connection, reads the request and replies with `reply`.
    /// The connection stays open afterwards when `hold_open` is set.
    async fn one_shot_server(reply: &'static [u8], hold_open: bool) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = tokio::io::BufReader::new(stream);
            let mut line = String::new();
            let mut content_length = 0usize;
            loop {
                line.clear();
                let n = reader.read_line(&mut line).await.unwrap();
                if n == 0 || line == "\r\n" {
                    break;
                }
                if let Some(value) = line.strip_prefix("Content-Length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).await.unwrap();

            let mut stream = reader.into_inner();
            stream.write_all(reply).await.unwrap();
            if hold_open {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        });
        addr
    }

    #[test]
    fn stream_request_is_well_formed() {
        let text = stream_request_text("127.0.0.1:8080", "/sse");
        assert!(text.starts_with("GET /sse HTTP/1.1\r\n"));
        assert!(text.contains("Host: 127.0.0.1:8080\r\n"));
        assert!(text.contains("Accept: text/event-stream\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn rpc_request_declares_body_length() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#;
        let text = rpc_request_text("127.0.0.1:8080", "/mcp", body);
        assert!(text.starts_with("POST /mcp HTTP/1.1\r\n"));
        assert!(text.contains(&format!("Content-Length: {}\r\n", body.len())));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.ends_with(&format!("\r\n\r\n{body}")));
    }

    #[test]
    fn text_replaces_invalid_utf8() {
        let exchange = RawExchange {
            bytes: vec![b'o', b'k', 0xff],
            timed_out: false,
        };
        assert_eq!(exchange.text(), "ok\u{fffd}");
    }

    #[tokio::test]
    async fn stream_probe_reads_until_peer_closes() {
        let addr =
            one_shot_server(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n", false).await;

        let exchange = stream_probe(&addr, "/sse", Duration::from_secs(2))
            .await
            .expect("exchange");
        assert!(!exchange.timed_out);
        assert!(exchange.text().starts_with("HTTP/1.1 404 Not Found"));
    }

    #[tokio::test]
    async fn stream_probe_keeps_partial_data_on_timeout() {
        let addr = one_shot_server(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\r\nevent: endpoint\ndata: /messages\n\n",
            true,
        )
        .await;

        let exchange = stream_probe(&addr, "/sse", Duration::from_millis(300))
            .await
            .expect("exchange");
        assert!(exchange.timed_out);
        assert!(exchange.text().contains("event: endpoint"));
    }

    #[tokio::test]
    async fn silent_peer_times_out_as_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let limit = Duration::from_millis(300);
        let err = stream_probe(&addr, "/sse", limit).await.unwrap_err();
        assert!(
            matches!(err, ProberError::Timeout(d) if d == limit),
            "unexpected error: {err}"
        );
        assert!(err.to_string().starts_with("Timed out after"));
    }

    #[tokio::test]
    async fn raw_rpc_call_sends_json_body() {
        let addr = one_shot_server(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}",
            false,
        )
        .await;

        let request = JsonRpcRequest::new(1, "initialize", None);
        let exchange = raw_rpc_call(&addr, "/mcp", &request, Duration::from_secs(2))
            .await
            .expect("exchange");
        assert!(exchange.text().contains("\"result\":{}"));
    }

    #[tokio::test]
    async fn refused_connection_is_an_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = stream_probe(&addr, "/sse", Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProberError::Io(_)), "unexpected error: {err}");
    }
}
