//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use zmapi_relay::{HttpServer, RelayConfig, Shutdown};

/// Spawn the relay on `addr` with default settings and wait until it serves.
pub async fn spawn_relay(addr: SocketAddr) -> Shutdown {
    let mut config = RelayConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

#[allow(dead_code)]
fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable mock upstream.
///
/// The closure yields (status, content-type, body) per request; an empty
/// content-type omits the header entirely.
#[allow(dead_code)]
pub async fn start_programmable_upstream<F, Fut>(addr: SocketAddr, f: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String, Vec<u8>)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, content_type, body) = f().await;
                        let content_type_header = if content_type.is_empty() {
                            String::new()
                        } else {
                            format!("Content-Type: {}\r\n", content_type)
                        };
                        let head = format!(
                            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
                            status_line(status),
                            content_type_header,
                            body.len()
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(&body).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock upstream returning a fixed body with the given content type.
#[allow(dead_code)]
pub async fn start_mock_upstream(
    addr: SocketAddr,
    content_type: &'static str,
    body: &'static str,
) {
    start_programmable_upstream(addr, move || async move {
        (200, content_type.to_string(), body.as_bytes().to_vec())
    })
    .await;
}

/// Start an upstream that captures each request head and answers 200 OK.
#[allow(dead_code)]
pub async fn start_capturing_upstream(addr: SocketAddr) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());

                        let response =
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    rx
}

/// Start an upstream that advertises `advertised_len` bytes but drops the
/// connection after sending only `partial`.
#[allow(dead_code)]
pub async fn start_truncating_upstream(
    addr: SocketAddr,
    advertised_len: usize,
    partial: &'static [u8],
) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let head = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
                            advertised_len
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(partial).await;
                        let _ = socket.flush().await;
                        // Drop without sending the rest.
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start an upstream that streams chunks until its peer disconnects, then
/// reports the disconnect on the returned channel.
#[allow(dead_code)]
pub async fn start_endless_upstream(addr: SocketAddr) -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        // No content-length: the body runs until the peer goes away.
                        let head =
                            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n";
                        if socket.write_all(head.as_bytes()).await.is_err() {
                            let _ = tx.send(());
                            return;
                        }

                        let chunk = [0x5Au8; 1024];
                        loop {
                            if socket.write_all(&chunk).await.is_err() {
                                break;
                            }
                            if socket.flush().await.is_err() {
                                break;
                            }
                            tokio::time::sleep(Duration::from_millis(20)).await;
                        }
                        let _ = tx.send(());
                    });
                }
                Err(_) => break,
            }
        }
    });

    rx
}
