use crate::game::ClientGameState;
use crate::input::{InputAction, InputManager};
use crate::rendering::status_line;
use log::{info, warn};
use pong_shared::{Command, Side, Snapshot, SnapshotDecoder, WireError, RECV_BUFFER_SIZE};
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Protocol error: {0}")]
    Wire(#[from] WireError),
    #[error("Disconnected from server")]
    Disconnected,
}

/// One participant's connection to the server
pub struct Participant {
    stream: TcpStream,
    side: Side,
    decoder: SnapshotDecoder,
}

impl Participant {
    /// Connects and waits for the slot announcement
    ///
    /// A server that is already full closes the connection without
    /// announcing anything, which surfaces as [`ClientError::Disconnected`].
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let mut stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let mut decoder = SnapshotDecoder::new();
        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        let side = loop {
            if let Some(side) = decoder.next_slot()? {
                break side;
            }
            let len = stream.read(&mut buffer).await?;
            if len == 0 {
                return Err(ClientError::Disconnected);
            }
            decoder.push(&buffer[..len]);
        };

        info!("Connected to {} as Player {}", addr, side.slot());
        Ok(Self {
            stream,
            side,
            decoder,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Sends one command token, newline separated so that commands sharing
    /// a TCP segment stay distinct
    pub async fn send_command(&mut self, command: Command) -> Result<(), ClientError> {
        let token = format!("{}\n", command.as_token());
        self.stream.write_all(token.as_bytes()).await?;
        Ok(())
    }

    /// Waits for the next complete snapshot
    ///
    /// Cancel safe: bytes already read stay buffered in the decoder.
    pub async fn next_snapshot(&mut self) -> Result<Snapshot, ClientError> {
        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        loop {
            match self.decoder.next_snapshot() {
                Ok(Some(snapshot)) => return Ok(snapshot),
                Ok(None) => {}
                Err(e) => warn!("Dropping malformed update: {}", e),
            }

            let len = self.stream.read(&mut buffer).await?;
            if len == 0 {
                return Err(ClientError::Disconnected);
            }
            self.decoder.push(&buffer[..len]);
        }
    }
}

/// Terminal participant: stdin commands in, status line out
pub struct Client {
    participant: Participant,
    game_state: ClientGameState,
    input_manager: InputManager,
}

impl Client {
    pub async fn new(server_addr: &str) -> Result<Self, ClientError> {
        let participant = Participant::connect(server_addr).await?;
        let game_state = ClientGameState::new(participant.side());

        Ok(Client {
            participant,
            game_state,
            input_manager: InputManager::new(),
        })
    }

    /// Runs until the user quits or the connection drops
    ///
    /// A lost connection is reported and ends the loop; there is no
    /// automatic reconnect.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        println!("You are Player {}", self.game_state.side.slot());
        println!("Type up/down (or w/s) and press Enter, q to quit");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let result = loop {
            tokio::select! {
                snapshot = self.participant.next_snapshot() => {
                    match snapshot {
                        Ok(snapshot) => {
                            if self.game_state.apply_snapshot(snapshot) {
                                Self::draw(&self.game_state);
                            }
                        }
                        Err(e) => break Err(e),
                    }
                },

                line = lines.next_line() => {
                    match line? {
                        Some(line) => match self.input_manager.parse_line(&line) {
                            Some(InputAction::Move(command)) => {
                                if let Err(e) = self.participant.send_command(command).await {
                                    break Err(e);
                                }
                            }
                            Some(InputAction::Quit) => break Ok(()),
                            None => warn!("Unknown command: {:?}", line),
                        },
                        None => break Ok(()),
                    }
                },
            }
        };

        println!();
        match &result {
            Ok(()) => info!(
                "Leaving after {} updates and {} commands",
                self.game_state.snapshots_received,
                self.input_manager.commands_sent()
            ),
            Err(e) => println!("Disconnected: {}", e),
        }
        result
    }

    fn draw(state: &ClientGameState) {
        let mut stdout = std::io::stdout();
        // Rewrite the current line in place; a failed redraw is not worth stopping for
        let _ = write!(stdout, "\r\x1b[2K{}", status_line(state));
        let _ = stdout.flush();
    }
}
