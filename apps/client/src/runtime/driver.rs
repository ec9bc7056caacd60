//! Event loop: websocket frames, due timers and player intents, one at a
//! time, until shutdown or disconnect.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::game::GameSession;
use super::intents::UserIntent;
use super::transport::SocketIo;
use crate::config::Config;
use crate::domain::Catalog;
use crate::error::ClientError;
use crate::protocol::socket_io::Packet;
use crate::protocol::Outbound;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

async fn emit_all(io: &mut SocketIo, msgs: Vec<Outbound>) -> Result<(), ClientError> {
    for msg in &msgs {
        io.emit(msg).await?;
    }
    Ok(())
}

async fn sleep_until_due(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn millis_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub async fn run(
    config: Config,
    catalog: Catalog,
    mut intents: mpsc::Receiver<UserIntent>,
    shutdown: CancellationToken,
) -> Result<(), ClientError> {
    let mut io = SocketIo::connect(&config, CONNECT_TIMEOUT).await?;
    let mut session = GameSession::new(config, catalog);
    let start = Instant::now();
    let mut intents_open = true;

    let hello = session.on_connected();
    emit_all(&mut io, hello).await?;

    loop {
        let deadline = session
            .next_due_ms()
            .map(|ms| start + Duration::from_millis(ms));

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("[WS] shutting down");
                if let Err(err) = io.send(&Packet::Disconnect).await {
                    debug!(error = %err, "[WS] disconnect not delivered");
                }
                io.close().await;
                return Ok(());
            }
            packet = io.recv_packet() => {
                let packet = match packet {
                    Ok(packet) => packet,
                    Err(err) if err.is_frame_error() => {
                        warn!(error = %err, "[WS] dropping undecodable frame");
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                match packet {
                    Packet::Ping => io.send(&Packet::Pong).await?,
                    Packet::Event { name, args } => {
                        let due = session.advance(millis_since(start));
                        emit_all(&mut io, due).await?;
                        debug!(event = %name, "[WS] received");
                        let out = session.handle_inbound(&name, args, OffsetDateTime::now_utc());
                        emit_all(&mut io, out).await?;
                    }
                    Packet::Connect(_) => {
                        let hello = session.on_connected();
                        emit_all(&mut io, hello).await?;
                    }
                    Packet::Disconnect | Packet::Close => return Err(ClientError::Closed),
                    Packet::ConnectError(err) => {
                        return Err(ClientError::protocol(format!("server rejected namespace: {err}")))
                    }
                    other => debug!(packet = ?other, "[WS] ignored"),
                }
            }
            _ = sleep_until_due(deadline) => {
                let out = session.advance(millis_since(start));
                emit_all(&mut io, out).await?;
            }
            intent = intents.recv(), if intents_open => {
                match intent {
                    Some(intent) => {
                        let due = session.advance(millis_since(start));
                        emit_all(&mut io, due).await?;
                        let out = session.handle_intent(intent);
                        emit_all(&mut io, out).await?;
                    }
                    None => {
                        debug!("[WS] intent source closed");
                        intents_open = false;
                    }
                }
            }
        }
    }
}
