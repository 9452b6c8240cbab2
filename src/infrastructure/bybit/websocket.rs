//! Bybit public websocket transport.
//!
//! Owns the socket and its keep-alive: a protocol Ping frame is sent every
//! ping interval while waiting for the next text frame. A peer that has sent
//! nothing back, not even a Pong, by the time the next ping is due is treated
//! as dead.

use crate::domain::errors::FeedError;
use crate::domain::ports::{FeedConnection, FeedConnector};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info};

pub struct BybitFeedConnector {
    ws_url: String,
    ping_interval: Duration,
}

impl BybitFeedConnector {
    pub fn new(ws_url: String, ping_interval: Duration) -> Self {
        Self {
            ws_url,
            ping_interval,
        }
    }
}

#[async_trait]
impl FeedConnector for BybitFeedConnector {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError> {
        info!("Connecting to Bybit WebSocket: {}", self.ws_url);

        let (stream, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| FeedError::Connect {
                reason: e.to_string(),
            })?;

        info!("Bybit WebSocket connected");

        let mut ping = tokio::time::interval_at(Instant::now() + self.ping_interval, self.ping_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Box::new(BybitFeedConnection {
            stream,
            ping,
            last_ping: None,
            last_seen: Instant::now(),
        }))
    }
}

pub struct BybitFeedConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    ping: Interval,
    last_ping: Option<Instant>,
    /// Last inbound frame of any kind, Pongs included
    last_seen: Instant,
}

#[async_trait]
impl FeedConnection for BybitFeedConnection {
    async fn send_text(&mut self, text: String) -> Result<(), FeedError> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| FeedError::Send {
                reason: e.to_string(),
            })
    }

    async fn next_text(&mut self) -> Result<String, FeedError> {
        loop {
            // Buffered frames are drained before a ping tick is judged
            tokio::select! {
                biased;

                frame = self.stream.next() => {
                    if matches!(frame, Some(Ok(_))) {
                        self.last_seen = Instant::now();
                    }
                    match frame {
                        Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                        Some(Ok(Message::Binary(bytes))) => {
                            if let Ok(text) = String::from_utf8(bytes.to_vec()) {
                                return Ok(text);
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let reason = frame
                                .map(|cf| format!("code {} reason '{}'", cf.code, cf.reason))
                                .unwrap_or_else(|| "no close frame".to_string());
                            return Err(FeedError::Closed { reason });
                        }
                        // Pongs to server pings are queued by tungstenite and
                        // flushed on the next read or write
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            return Err(FeedError::Receive { reason: e.to_string() });
                        }
                        None => {
                            return Err(FeedError::Closed {
                                reason: "stream ended".to_string(),
                            });
                        }
                    }
                }
                _ = self.ping.tick() => {
                    if self.last_ping.is_some_and(|sent| self.last_seen < sent) {
                        return Err(FeedError::Receive {
                            reason: format!(
                                "pong timeout: nothing received for {:?}",
                                self.last_seen.elapsed()
                            ),
                        });
                    }
                    debug!("Sending keep-alive ping");
                    self.stream
                        .send(Message::Ping(Vec::new().into()))
                        .await
                        .map_err(|e| FeedError::Send { reason: e.to_string() })?;
                    self.last_ping = Some(Instant::now());
                }
            }
        }
    }
}
