//! Socket.IO client over a tokio-tungstenite websocket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ClientError;
use crate::protocol::socket_io::{endpoint, Packet};
use crate::protocol::Outbound;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct SocketIo {
    stream: WsStream,
}

impl SocketIo {
    /// Open the websocket and complete the Engine.IO and Socket.IO
    /// handshakes, authenticating with the configured token.
    pub async fn connect(config: &Config, timeout: Duration) -> Result<Self, ClientError> {
        let url = endpoint(&config.server_url);
        tokio::time::timeout(timeout, Self::handshake(url, config))
            .await
            .map_err(|e| ClientError::transport("timed out connecting to game server", e))?
    }

    async fn handshake(url: String, config: &Config) -> Result<Self, ClientError> {
        debug!(url = %url, "[WS] connecting");
        let (stream, _) = connect_async(url.as_str()).await?;
        let mut io = Self { stream };

        match io.recv_packet().await? {
            Packet::Open(open) => debug!(open = %open, "[WS] engine.io open"),
            other => {
                return Err(ClientError::protocol(format!(
                    "expected engine.io open, got {other:?}"
                )))
            }
        }

        io.send(&Packet::connect_with_token(&config.username, &config.token))
            .await?;
        loop {
            match io.recv_packet().await? {
                Packet::Connect(_) => break,
                Packet::Ping => io.send(&Packet::Pong).await?,
                Packet::ConnectError(err) => {
                    return Err(ClientError::protocol(format!("connect refused: {err}")))
                }
                other => debug!(packet = ?other, "[WS] ignored before connect"),
            }
        }
        info!(user = %config.username, "[WS] connected");
        Ok(io)
    }

    pub async fn send(&mut self, packet: &Packet) -> Result<(), ClientError> {
        self.stream.send(Message::text(packet.encode())).await?;
        Ok(())
    }

    pub async fn emit(&mut self, msg: &Outbound) -> Result<(), ClientError> {
        debug!(event = msg.name(), "[WS] emit");
        self.send(&Packet::event(msg.name(), msg.args())).await
    }

    /// Next Socket.IO packet. Websocket control frames are skipped.
    pub async fn recv_packet(&mut self) -> Result<Packet, ClientError> {
        loop {
            match self.stream.next().await {
                None => return Err(ClientError::Closed),
                Some(Err(err)) => return Err(err.into()),
                Some(Ok(Message::Text(text))) => return Packet::decode(text.as_str()),
                Some(Ok(Message::Close(_))) => return Err(ClientError::Closed),
                Some(Ok(Message::Binary(_))) => {
                    return Err(ClientError::protocol("binary frames are not supported"))
                }
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn close(mut self) {
        if let Err(err) = self.stream.close(None).await {
            debug!(error = %err, "[WS] close failed");
        }
    }
}
