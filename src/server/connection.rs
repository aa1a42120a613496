//! Per-peer gateway
//!
//! Owns one admitted WebSocket for its whole life: reads requests in arrival
//! order, writes responses and queued push events, and enforces the idle
//! timeout. Whether the connection ends in a clean close, a socket error or
//! a timeout, teardown goes through the handler's single disconnect path.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::error::ConnectionError;
use crate::protocol::{
    ErrorBody, PeerId, RequestEnvelope, ResponseEnvelope, ServerEvent, ServerMessage,
};
use crate::session::{PeerSession, SignalingHandler};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsStream = SplitStream<WebSocketStream<TcpStream>>;

/// Gateway task state for one connected peer
pub struct Connection {
    peer_id: PeerId,
    session: Arc<RwLock<PeerSession>>,
    handler: Arc<SignalingHandler>,
    idle_timeout: Duration,
}

impl Connection {
    pub fn new(
        peer_id: PeerId,
        session: Arc<RwLock<PeerSession>>,
        handler: Arc<SignalingHandler>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            peer_id,
            session,
            handler,
            idle_timeout,
        }
    }

    /// Serve the connection until it ends, then tear the peer down
    pub async fn run(
        self,
        ws: WebSocketStream<TcpStream>,
        mut push_rx: mpsc::Receiver<ServerEvent>,
    ) -> Result<(), ConnectionError> {
        let (mut sink, mut stream) = ws.split();

        let result = self.serve(&mut sink, &mut stream, &mut push_rx).await;

        // Single disconnect path: runs for clean closes, errors and idle
        // timeouts alike, and is idempotent inside the handler.
        self.handler.disconnect(self.peer_id).await;
        let _ = sink.close().await;

        result
    }

    async fn serve(
        &self,
        sink: &mut WsSink,
        stream: &mut WsStream,
        push_rx: &mut mpsc::Receiver<ServerEvent>,
    ) -> Result<(), ConnectionError> {
        let mut deadline = tokio::time::Instant::now() + self.idle_timeout;

        loop {
            tokio::select! {
                frame = stream.next() => {
                    deadline = tokio::time::Instant::now() + self.idle_timeout;

                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text(&text, sink).await?;
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            sink.send(Message::Pong(payload)).await?;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::debug!(peer = %self.peer_id, "Connection closed by peer");
                            return Ok(());
                        }
                        Some(Ok(_)) => {
                            // binary and pong frames carry nothing for us
                        }
                        Some(Err(e)) => return Err(e.into()),
                    }
                }
                event = push_rx.recv() => {
                    match event {
                        Some(event) => self.send(sink, ServerMessage::Event(event)).await?,
                        None => return Err(ConnectionError::ChannelClosed),
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    tracing::info!(peer = %self.peer_id, "Idle timeout, closing connection");
                    return Ok(());
                }
            }
        }
    }

    async fn handle_text(&self, text: &str, sink: &mut WsSink) -> Result<(), ConnectionError> {
        let envelope: RequestEnvelope = match serde_json::from_str(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(peer = %self.peer_id, error = %e, "Malformed request");
                let body = ErrorBody {
                    code: "badRequest".to_string(),
                    message: format!("malformed request: {e}"),
                };
                return self
                    .send(sink, ServerMessage::Response(ResponseEnvelope::err(0, body)))
                    .await;
            }
        };

        let id = envelope.id;
        match self.handler.handle_request(&self.session, envelope.request).await {
            Some(Ok(payload)) => {
                self.send(sink, ServerMessage::Response(ResponseEnvelope::ok(id, payload)))
                    .await
            }
            Some(Err(e)) => {
                tracing::debug!(peer = %self.peer_id, code = e.code(), error = %e, "Request failed");
                self.send(
                    sink,
                    ServerMessage::Response(ResponseEnvelope::err(id, e.body())),
                )
                .await
            }
            None => Ok(()),
        }
    }

    async fn send(&self, sink: &mut WsSink, message: ServerMessage) -> Result<(), ConnectionError> {
        let json = serde_json::to_string(&message)?;
        sink.send(Message::Text(json)).await?;
        Ok(())
    }
}
