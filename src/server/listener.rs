//! Signaling server listener
//!
//! Handles the TCP accept loop, admission at the WebSocket upgrade, and
//! spawning one gateway task per admitted peer. Admission enforces token
//! *presence* only; token content is validated by the external auth
//! service, not here.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Semaphore};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::WebSocketStream;

use crate::engine::{EngineAdapter, MediaEngine};
use crate::protocol::PeerId;
use crate::registry::RoomRegistry;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::session::{PeerMap, SignalingHandler};
use crate::stats::ServerStats;

/// Signaling server
pub struct SignalingServer {
    config: ServerConfig,
    handler: Arc<SignalingHandler>,
    stats: Arc<ServerStats>,
    next_peer_id: AtomicU64,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl SignalingServer {
    /// Create a new server wired to the given media engine
    pub fn new(config: ServerConfig, engine: Arc<dyn MediaEngine>) -> Self {
        let stats = Arc::new(ServerStats::new());
        let adapter = EngineAdapter::new(engine, config.engine_timeout);
        let handler = Arc::new(SignalingHandler::new(
            Arc::new(RoomRegistry::new()),
            Arc::new(PeerMap::new()),
            adapter,
            config.chat_include_sender,
            stats.clone(),
        ));

        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            handler,
            stats,
            next_peer_id: AtomicU64::new(1),
            connection_semaphore,
        }
    }

    /// The negotiation handler shared by all connections
    pub fn handler(&self) -> &Arc<SignalingHandler> {
        &self.handler
    }

    /// Server-wide counters
    pub fn stats(&self) -> &Arc<ServerStats> {
        &self.stats
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Signaling server listening");

        self.serve(listener).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Signaling server listening");

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.serve(listener) => result,
        }
    }

    /// Accept connections from an already-bound listener
    ///
    /// Useful when the caller needs the ephemeral port before starting.
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    async fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(addr = %peer_addr, "Connection rejected: limit reached");
                    self.stats.connection_rejected();
                    return;
                }
            }
        } else {
            None
        };

        let peer_id = PeerId(self.next_peer_id.fetch_add(1, Ordering::Relaxed));
        let handler = Arc::clone(&self.handler);
        let stats = Arc::clone(&self.stats);
        let config = self.config.clone();

        tokio::spawn(async move {
            let _permit = permit;

            let ws = match admit(socket).await {
                Ok(ws) => ws,
                Err(e) => {
                    stats.connection_rejected();
                    tracing::warn!(addr = %peer_addr, error = %e, "Connection rejected at admission");
                    return;
                }
            };

            stats.connection_opened();
            tracing::info!(peer = %peer_id, addr = %peer_addr, "Peer admitted");

            let (push_tx, push_rx) = mpsc::channel(config.push_capacity);
            let session = handler.register_peer(peer_id, push_tx).await;
            let connection = Connection::new(peer_id, session, handler, config.idle_timeout);

            if let Err(e) = connection.run(ws, push_rx).await {
                tracing::debug!(peer = %peer_id, error = %e, "Connection error");
            }

            stats.connection_closed();
            tracing::debug!(peer = %peer_id, "Connection closed");
        });
    }
}

/// Accept the WebSocket upgrade, refusing it when no auth token is present
///
/// Rejection happens during the handshake, before any request is processed.
async fn admit(
    socket: TcpStream,
) -> Result<WebSocketStream<TcpStream>, tokio_tungstenite::tungstenite::Error> {
    accept_hdr_async(socket, |request: &Request, response: Response| {
        if auth_token(request).is_some() {
            Ok(response)
        } else {
            let mut rejection = ErrorResponse::new(Some("missing auth token".to_string()));
            *rejection.status_mut() = StatusCode::UNAUTHORIZED;
            Err(rejection)
        }
    })
    .await
}

/// Opaque auth token from the upgrade request: `?token=` query parameter or
/// `Authorization` header (with or without a `Bearer` prefix)
fn auth_token(request: &Request) -> Option<String> {
    if let Some(query) = request.uri().query() {
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("token=") {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
