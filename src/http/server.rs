//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Create the Axum Router and dispatch by path
//! - Bind the listener and run the accept loop in the background
//! - Stop gracefully, giving up on stragglers after a deadline
//!
//! # Dispatch
//! ```text
//! /            → asset "index.html"
//! /api/proxy   → proxy::forward (any method)
//! /<path>      → asset "<path>" (percent-decoded, leading slash stripped)
//! ```

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::assets::AssetLoader;
use crate::config::validation::{join_errors, validate_config, ValidationError};
use crate::config::ServerConfig;
use crate::http::static_files::serve_asset;
use crate::lifecycle::Shutdown;
use crate::proxy::{self, HttpTransport, Transport, TransportError};

/// Error type for starting and stopping the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),
    #[error("failed to build outbound client: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<dyn AssetLoader>,
    pub transport: Arc<dyn Transport>,
    pub index: Arc<str>,
    pub not_found: Arc<str>,
}

/// The embedded server, configured but not yet listening.
pub struct LocalServer {
    config: ServerConfig,
    state: AppState,
}

impl LocalServer {
    /// Create a server over `assets` using the default outbound transport.
    pub fn new(config: ServerConfig, assets: impl AssetLoader) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ServerError::Config)?;
        let transport = HttpTransport::new(&config.timeouts)?;
        Ok(Self::with_parts(config, Arc::new(assets), Arc::new(transport)))
    }

    /// Create a server from already shared parts.
    fn with_parts(
        config: ServerConfig,
        assets: Arc<dyn AssetLoader>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let state = AppState {
            assets,
            transport,
            index: Arc::from(config.assets.index.as_str()),
            not_found: Arc::from(config.assets.not_found.as_str()),
        };
        Self { config, state }
    }

    /// Replace the outbound transport.
    pub fn with_transport(mut self, transport: impl Transport) -> Self {
        self.state.transport = Arc::new(transport);
        self
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", any(index_handler))
            .route(&self.config.proxy.path, any(proxy_handler))
            .route("/{*path}", any(asset_handler))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and start accepting connections.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let addr: SocketAddr = self.config.listener.bind_address.parse().map_err(|e| {
            ServerError::Config(vec![ValidationError {
                field: "listener.bind_address",
                message: format!("{e}"),
            }])
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener)
    }

    /// Start accepting connections on an already bound listener.
    pub fn serve(self, listener: TcpListener) -> Result<ServerHandle, ServerError> {
        let local_addr = listener.local_addr()?;
        let router = self.router();
        let shutdown = Shutdown::new();
        let signal = shutdown.signalled();

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
        });

        let handle = ServerHandle {
            local_addr,
            shutdown,
            drain: Duration::from_secs(self.config.timeouts.shutdown_secs),
            task: Some(task),
        };
        tracing::info!(
            port = handle.port(),
            origin = %handle.origin(),
            "Server running"
        );
        Ok(handle)
    }
}

impl fmt::Debug for LocalServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A running server. Dropping the handle also stops it, without waiting.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    drain: Duration,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// The local origin clients should treat as "this app".
    pub fn origin(&self) -> String {
        format!("http://localhost:{}", self.port())
    }

    /// Stop accepting, let in-flight requests finish, then return.
    ///
    /// After the drain deadline the accept loop is aborted and `stop`
    /// returns; connections still open are left to finish on their own.
    /// Calling `stop` again after it returned is a no-op.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let Some(mut task) = self.task.take() else {
            return Ok(());
        };

        tracing::info!(port = self.port(), origin = %self.origin(), "Server stopping");
        self.shutdown.trigger();

        let result = match tokio::time::timeout(self.drain, &mut task).await {
            Ok(Ok(served)) => served.map_err(ServerError::from),
            Ok(Err(join)) => Err(ServerError::Io(std::io::Error::other(join))),
            Err(_) => {
                tracing::warn!(
                    drain_secs = self.drain.as_secs(),
                    "In-flight requests did not finish, no longer waiting"
                );
                task.abort();
                Ok(())
            }
        };

        tracing::info!(port = self.port(), "Server stopped");
        result
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.shutdown.trigger();
        }
    }
}

async fn index_handler(State(state): State<AppState>) -> Response {
    serve_asset(state.assets.as_ref(), &state.not_found, &state.index).await
}

async fn asset_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve_asset(state.assets.as_ref(), &state.not_found, &path).await
}

async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    proxy::forward(state.transport, request).await.into_response()
}
