//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use asset_proxy::proxy::Transport;
use asset_proxy::{LocalServer, MemoryAssets, ServerConfig, ServerHandle};
use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.timeouts.request_secs = 5;
    config
}

/// Start the server under test on an ephemeral port.
pub async fn start_server(assets: MemoryAssets) -> ServerHandle {
    LocalServer::new(test_config(), assets)
        .unwrap()
        .start()
        .await
        .unwrap()
}

/// Start the server under test with its outbound calls going to `transport`.
pub async fn start_server_with(
    assets: MemoryAssets,
    transport: impl Transport,
) -> ServerHandle {
    LocalServer::new(test_config(), assets)
        .unwrap()
        .with_transport(transport)
        .start()
        .await
        .unwrap()
}

/// Send `request` verbatim over a fresh connection and return everything
/// the server wrote back. `request` must ask for `Connection: close`.
pub async fn raw_exchange(addr: SocketAddr, request: &str) -> String {
    let mut socket = tokio::net::TcpStream::connect(addr).await.unwrap();
    socket.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Client that talks to the server directly, ignoring any system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Start a raw TCP backend that answers every connection with a fixed
/// response. Returns its address.
pub async fn start_mock_backend(head: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                // Read (and ignore) the request head before answering.
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{head}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// What an echo backend saw.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// An echo backend: replies with the request body and records every request.
pub struct EchoBackend {
    pub addr: SocketAddr,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl EchoBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start an echo backend that waits `delay` before answering.
pub async fn start_echo_backend(delay: Duration) -> EchoBackend {
    let seen: Arc<Mutex<Vec<Seen>>> = Arc::default();
    let recorder = seen.clone();

    let app = Router::new().fallback(
        move |method: Method, uri: axum::http::Uri, headers: HeaderMap, body: Bytes| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(Seen {
                    method,
                    path: uri.path().to_string(),
                    headers,
                    body: body.clone(),
                });
                tokio::time::sleep(delay).await;
                ([("x-custom", "upstream"), ("x-upstream", "echo")], body)
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    EchoBackend { addr, seen }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Base URL of a running server, by IP so name resolution plays no part.
pub fn base(server: &ServerHandle) -> String {
    format!("http://{}", server.local_addr())
}
