//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_gateway::{GatewayConfig, HttpServer, ServiceRoute, Shutdown};
use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{HeaderMap, Method, Uri},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

/// An address nothing listens on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Gateway config with one service per `(name, prefix, backend)` tuple.
pub fn gateway_config(services: &[(&str, &str, SocketAddr)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;
    config.services = services
        .iter()
        .map(|(name, prefix, addr)| ServiceRoute::new(*name, *prefix, format!("http://{}", addr)))
        .collect();
    config
}

/// Start the gateway on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).expect("valid gateway config");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Read one request (head plus `Content-Length` body) from a raw socket.
pub async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return buf,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    buf
}

/// Start a backend that answers every request with the same raw bytes.
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a programmable mock backend with async support.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    201 => "201 Created",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// What a stalling backend observed on one of its connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// A full request arrived.
    Received,
    /// The gateway closed the connection.
    Closed,
}

/// Start a backend that reads the request, writes `partial` and then never
/// finishes the response.
pub async fn start_stalling_backend(
    partial: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<BackendEvent>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let events_tx = events_tx.clone();
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let _ = events_tx.send(BackendEvent::Received);
                if !partial.is_empty() {
                    let _ = socket.write_all(partial.as_bytes()).await;
                    let _ = socket.flush().await;
                }
                let mut rest = [0u8; 1024];
                loop {
                    match socket.read(&mut rest).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => continue,
                    }
                }
                let _ = events_tx.send(BackendEvent::Closed);
            });
        }
    });

    (addr, events_rx)
}

/// Start a backend that reads the request and never answers.
pub async fn start_hanging_backend() -> (SocketAddr, mpsc::UnboundedReceiver<BackendEvent>) {
    start_stalling_backend("").await
}

/// Wait until `events` reports `wanted`, or give up after `within`.
pub async fn wait_for_event(
    events: &mut mpsc::UnboundedReceiver<BackendEvent>,
    wanted: BackendEvent,
    within: Duration,
) -> bool {
    let wait = async {
        while let Some(event) = events.recv().await {
            if event == wanted {
                return true;
            }
        }
        false
    };
    tokio::time::timeout(within, wait).await.unwrap_or(false)
}

/// Start a backend that streams a chunked body, pausing after the first
/// chunk until `release` fires.
pub async fn start_paused_stream_backend() -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            read_request(&mut socket).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nfirst\r\n")
                .await;
            let _ = socket.flush().await;
            let _ = release_rx.await;
            let _ = socket.write_all(b"6\r\nsecond\r\n0\r\n\r\n").await;
            let _ = socket.shutdown().await;
        }
    });

    (addr, release_tx)
}

/// Start an axum backend that describes every request it receives as JSON.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new()
        .fallback(move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| async move {
            let header_map: Map<String, Value> = headers
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        Value::String(v.to_str().unwrap_or_default().to_string()),
                    )
                })
                .collect();

            (
                [("x-served-by", name), ("x-upstream-custom", "preserved")],
                Json(json!({
                    "service": name,
                    "method": method.as_str(),
                    "path": uri.path(),
                    "query": uri.query(),
                    "headers": header_map,
                    "body_len": body.len(),
                    "body_sum": body.iter().map(|&b| b as u64).sum::<u64>(),
                })),
            )
        })
        .layer(DefaultBodyLimit::disable());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
