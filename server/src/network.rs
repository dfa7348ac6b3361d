//! Connection manager: TCP listener, slot assignment, and disconnect handling

use crate::clock::{interval_ticker, run_clock};
use crate::connection::{ConnectionHandler, Disconnect};
use crate::error::ServerError;
use crate::game::GameState;
use crate::session::SharedSession;
use log::{error, info, warn};
use pong_shared::{Side, DEFAULT_PORT, READ_TIMEOUT_MS, TICK_INTERVAL_MS};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Messages sent from connection handlers to the manager loop
#[derive(Debug)]
pub enum ServerMessage {
    ParticipantLeft { side: Side, reason: Disconnect },
}

/// Server tunables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: String,
    /// Simulation tick period
    pub tick_interval: Duration,
    /// How long a handler waits for input before sending a snapshot anyway
    pub read_timeout: Duration,
}

impl ServerConfig {
    /// Default tunables listening on all interfaces at `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            addr: format!("0.0.0.0:{}", port),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            read_timeout: Duration::from_millis(READ_TIMEOUT_MS),
        }
    }
}

/// Owns the listening socket and is the only writer of slot transitions
pub struct Server {
    listener: TcpListener,
    session: SharedSession,
    config: ServerConfig,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Server {
    /// Binds the listener. Failure here is fatal; nothing has been spawned yet.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.addr.clone(),
                source,
            })?;
        info!("Server listening on {}", listener.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            session: SharedSession::new(GameState::new()),
            config,
            server_tx,
            server_rx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the shared game, for observers such as tests
    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }

    /// Spawns the simulation clock on its own task
    fn spawn_clock(&self) {
        let session = self.session.clone();
        let ticker = interval_ticker(self.config.tick_interval);
        tokio::spawn(async move {
            run_clock(session, ticker).await;
        });
    }

    /// Admits or rejects a freshly accepted connection
    async fn handle_accept(&self, stream: TcpStream, addr: SocketAddr) {
        let Some(side) = self.session.join(addr).await else {
            warn!("Rejecting {}: server full", addr);
            drop(stream);
            return;
        };

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
        }

        info!(
            "Player {} connected from {} ({} of 2)",
            side.slot(),
            addr,
            self.session.participant_count().await
        );

        let handler = ConnectionHandler::new(
            stream,
            side,
            self.session.clone(),
            self.server_tx.clone(),
            self.config.read_timeout,
        );
        tokio::spawn(handler.run());
    }

    async fn handle_message(&self, message: ServerMessage) {
        match message {
            ServerMessage::ParticipantLeft { side, reason } => {
                if self.session.leave(side).await {
                    info!(
                        "Slot {} freed ({}), {} of 2 connected",
                        side.slot(),
                        reason,
                        self.session.participant_count().await
                    );
                } else {
                    warn!("Disconnect for slot {} which was not held", side.slot());
                }
            }
        }
    }

    /// Runs the clock and the accept loop. Only returns on a listener error
    /// that cannot be recovered from.
    pub async fn run(mut self) -> Result<(), ServerError> {
        self.spawn_clock();

        info!("Server started successfully");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => self.handle_accept(stream, addr).await,
                        Err(e) => {
                            // Per-connection failures such as ECONNABORTED land here
                            error!("Accept failed: {}", e);
                        }
                    }
                },

                Some(message) = self.server_rx.recv() => {
                    self.handle_message(message).await;
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn test_config() -> ServerConfig {
        ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            tick_interval: Duration::from_millis(5),
            read_timeout: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "0.0.0.0:6000");
        assert_eq!(config.tick_interval, Duration::from_millis(33));
        assert_eq!(config.read_timeout, Duration::from_millis(100));

        let config = ServerConfig::with_port(7100);
        assert_eq!(config.addr, "0.0.0.0:7100");
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let result = Server::bind(ServerConfig {
            addr: addr.to_string(),
            ..test_config()
        })
        .await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_address() {
        let result = Server::bind(ServerConfig {
            addr: "not-an-address".to_string(),
            ..test_config()
        })
        .await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_disconnect_message_frees_slot() {
        let server = Server::bind(test_config()).await.unwrap();
        let session = server.session();
        let side = session
            .join(SocketAddr::from(([127, 0, 0, 1], 1)))
            .await
            .unwrap();
        assert_eq!(session.participant_count().await, 1);

        server
            .handle_message(ServerMessage::ParticipantLeft {
                side,
                reason: Disconnect::PeerClosed,
            })
            .await;
        assert_eq!(session.participant_count().await, 0);

        // A second notification for the same slot is harmless
        server
            .handle_message(ServerMessage::ParticipantLeft {
                side,
                reason: Disconnect::PeerClosed,
            })
            .await;
        assert_eq!(session.participant_count().await, 0);
    }

    #[tokio::test]
    async fn test_accept_assigns_slots_in_order() {
        let server = Server::bind(test_config()).await.unwrap();
        let addr = server.local_addr().unwrap();
        let session = server.session();
        tokio::spawn(server.run());

        let mut first = TcpStream::connect(addr).await.unwrap();
        let mut byte = [0u8; 1];
        first.read_exact(&mut byte).await.unwrap();
        assert_eq!(&byte, b"1");

        let mut second = TcpStream::connect(addr).await.unwrap();
        second.read_exact(&mut byte).await.unwrap();
        assert_eq!(&byte, b"2");

        assert_eq!(session.participant_count().await, 2);
        assert!(session.is_active().await);
    }
}
