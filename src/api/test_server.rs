//! One-shot HTTP responder for exercising the fetchers against canned answers.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct CannedServer {
    pub base_url: String,
    /// Resolves to the request line of the single request served
    pub request: JoinHandle<String>,
}

pub async fn serve_once(status: u16, content_type: &'static str, body: &'static str) -> CannedServer {
    serve_once_after(Duration::ZERO, status, content_type, body).await
}

/// Like `serve_once`, but holds the answer back for `delay` after the request
/// arrives.
pub async fn serve_once_after(
    delay: Duration,
    status: u16,
    content_type: &'static str,
    body: &'static str,
) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let request = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    CannedServer {
        base_url: format!("http://{}", addr),
        request,
    }
}

/// Base URL nothing is listening on.
pub async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
