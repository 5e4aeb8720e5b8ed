//! Websocket lifecycle: connect, subscribe/unsubscribe, keepalive, read
//! loop.

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use futures_channel::mpsc::{unbounded, UnboundedSender};
use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::auth::{Auth, WsAuthFields};
use crate::config;
use crate::error::AdapterError;
use crate::universe::Universe;

pub mod data;
pub mod handler;

use handler::Handler;

/// Seconds between keepalive pings.
const KEEPALIVE_SECS: u64 = 30;

/// Channels subscribed for every product: `level2` feeds ticks, `ticker`
/// feeds trades, `user` feeds order statuses and transactions.
const CHANNELS: [&str; 3] = ["level2", "ticker", "user"];

/// `User-Agent` presented at the websocket handshake.
const WS_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Read half of the feed connection, handed to [`Connector::stream_forever`].
pub type Reader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

#[derive(Serialize, Debug)]
struct SubscriptionMessage<'a> {
    #[serde(rename = "type")]
    action: &'a str,
    product_ids: Vec<String>,
    channels: [&'static str; 3],
    #[serde(flatten)]
    auth: WsAuthFields,
}

/// Wraps the single feed connection. All writes (control frames, pings,
/// pongs) funnel through one channel into a writer task, so no two tasks
/// ever touch the sink.
#[derive(Debug)]
pub struct Connector {
    auth: Arc<Auth>,
    writer: OnceLock<UnboundedSender<Message>>,
}

impl Connector {
    /// Build an unconnected connector.
    #[must_use]
    pub fn new(auth: Arc<Auth>) -> Self {
        Self {
            auth,
            writer: OnceLock::new(),
        }
    }

    /// Perform the TLS + websocket handshake against the profile feed
    /// host, spawn the writer and the detached keepalive tasks, and hand
    /// back the read half.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the handshake fails or the connector was
    /// already connected (reconnection is not supported).
    pub async fn connect(&self) -> Result<Reader> {
        let mut request = config::WS_URL.into_client_request()?;
        request
            .headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static(WS_USER_AGENT));

        let (ws_stream, _) = connect_async(request).await?;
        log::info!("Websocket handshake completed with {}", config::WS_URL);

        let (write, read) = ws_stream.split();
        let (tx, rx) = unbounded();

        tokio::spawn(async move {
            if let Err(error) = rx.map(Ok).forward(write).await {
                log::error!("Stream writer failed: {error}");
            }
        });

        let keepalive_tx = tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(KEEPALIVE_SECS)).await;

                if keepalive_tx
                    .unbounded_send(Message::Ping(b"keepalive".to_vec()))
                    .is_err()
                {
                    break;
                }
            }
        });

        if self.writer.set(tx).is_err() {
            anyhow::bail!("stream connector connected twice");
        }

        Ok(read)
    }

    /// Subscribe every product of `universe` on all three channels.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the connector is not connected or the writer
    /// task is gone.
    pub fn subscribe_products(&self, universe: &Universe) -> Result<()> {
        self.send_subscription("subscribe", universe)
    }

    /// Unsubscribe every product of `universe`; a no-op when the universe
    /// is empty.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the connector is not connected or the writer
    /// task is gone.
    pub fn unsubscribe_products(&self, universe: &Universe) -> Result<()> {
        if universe.is_empty() {
            return Ok(());
        }

        self.send_subscription("unsubscribe", universe)
    }

    /// Loop reading frames, handing each text frame synchronously to the
    /// handler. Pings are answered through the writer channel.
    ///
    /// # Errors
    ///
    /// Read errors and connection close are fatal: they propagate out to
    /// the supervisor, which tears the process down.
    pub async fn stream_forever(&self, mut reader: Reader, mut handler: Handler) -> Result<()> {
        while let Some(frame) = reader.next().await {
            match frame? {
                Message::Text(message) => handler.on_message(&message).await,
                Message::Ping(payload) => self.send_raw(Message::Pong(payload))?,
                Message::Close(_) => anyhow::bail!(AdapterError::StreamClosed),
                _ => {}
            }
        }

        anyhow::bail!(AdapterError::StreamClosed)
    }

    fn send_subscription(&self, action: &str, universe: &Universe) -> Result<()> {
        let message = SubscriptionMessage {
            action,
            product_ids: universe.snapshot(),
            channels: CHANNELS,
            auth: self.auth.ws_auth_fields(),
        };

        self.send_raw(Message::Text(serde_json::to_string(&message)?))
    }

    fn send_raw(&self, message: Message) -> Result<()> {
        let writer = self
            .writer
            .get()
            .ok_or(AdapterError::StreamNotConnected)?;

        writer
            .unbounded_send(message)
            .map_err(|_| AdapterError::StreamClosed.into())
    }
}
