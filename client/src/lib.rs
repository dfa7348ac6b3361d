//! # Pong Participant Library
//!
//! Headless participant for the authoritative pong server. It connects over
//! TCP, learns which paddle it controls, forwards `up` / `down` commands, and
//! keeps the latest authoritative snapshot for display.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - [`network::Participant`]: the connection itself (slot handshake, command
//!   sending, snapshot stream decoding)
//! - [`network::Client`]: the interactive terminal loop built on top of it
//!
//! ### Game Module (`game`)
//! Holds the most recent snapshot. There is no prediction, reconciliation
//! or interpolation; the server is the only source of truth.
//!
//! ### Input Module (`input`)
//! Maps typed lines to paddle commands.
//!
//! ### Rendering Module (`rendering`)
//! Formats a one-line text status. Drawing pixels is left to real front ends.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use pong_client::network::Participant;
//! use pong_shared::Command;
//!
//! # async fn demo() -> Result<(), pong_client::network::ClientError> {
//! let mut participant = Participant::connect("127.0.0.1:6000").await?;
//! println!("Playing as {}", participant.side().slot());
//!
//! participant.send_command(Command::Up).await?;
//! let snapshot = participant.next_snapshot().await?;
//! println!("Score {} - {}", snapshot.score1, snapshot.score2);
//! # Ok(())
//! # }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
