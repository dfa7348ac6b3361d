//! Per-participant connection handler
//!
//! Each accepted connection gets one handler task. The handler announces
//! the participant's slot, then loops over two triggers: input arriving
//! (bounded by the read timeout) and the timeout elapsing. Either way it
//! finishes the iteration by pushing a fresh snapshot, so a participant
//! hears from the server at least once per timeout period and right after
//! every input it sends.

use crate::network::ServerMessage;
use crate::session::SharedSession;
use log::{debug, error, info};
use pong_shared::protocol::{encode_slot, encode_snapshot, parse_commands};
use pong_shared::{Side, WireError, RECV_BUFFER_SIZE};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Why a handler stopped. Always local to that one connection.
#[derive(Error, Debug)]
pub enum Disconnect {
    #[error("peer closed the connection")]
    PeerClosed,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Wire(#[from] WireError),
}

pub struct ConnectionHandler<S> {
    stream: S,
    side: Side,
    session: SharedSession,
    events: mpsc::UnboundedSender<ServerMessage>,
    read_timeout: Duration,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        side: Side,
        session: SharedSession,
        events: mpsc::UnboundedSender<ServerMessage>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            side,
            session,
            events,
            read_timeout,
        }
    }

    /// Serves the participant until the connection ends, then reports the
    /// disconnect to the connection manager
    pub async fn run(mut self) {
        let reason = match self.serve().await {
            Ok(()) => Disconnect::PeerClosed,
            Err(reason) => reason,
        };
        info!("Player {} disconnected: {}", self.side.slot(), reason);

        if let Err(e) = self.stream.shutdown().await {
            debug!("Shutdown for player {} failed: {}", self.side.slot(), e);
        }

        let message = ServerMessage::ParticipantLeft {
            side: self.side,
            reason,
        };
        if let Err(e) = self.events.send(message) {
            error!("Failed to notify manager of disconnect: {}", e);
        }
    }

    async fn serve(&mut self) -> Result<(), Disconnect> {
        self.stream.write_all(&encode_slot(self.side)).await?;

        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        loop {
            match timeout(self.read_timeout, self.stream.read(&mut buffer)).await {
                Ok(Ok(0)) => return Err(Disconnect::PeerClosed),
                Ok(Ok(len)) => self.handle_input(&buffer[..len]).await,
                Ok(Err(e)) => return Err(Disconnect::Io(e)),
                Err(_elapsed) => {}
            }

            self.send_snapshot().await?;
        }
    }

    async fn handle_input(&self, payload: &[u8]) {
        let commands = parse_commands(payload);
        if commands.is_empty() {
            debug!(
                "Ignoring input from player {}: {:?}",
                self.side.slot(),
                String::from_utf8_lossy(payload)
            );
            return;
        }
        self.session.apply_commands(self.side, &commands).await;
    }

    async fn send_snapshot(&mut self) -> Result<(), Disconnect> {
        let snapshot = self.session.snapshot().await;
        let data = encode_snapshot(&snapshot)?;
        self.stream.write_all(&data).await?;
        Ok(())
    }
}
