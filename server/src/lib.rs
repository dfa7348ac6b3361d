//! # Pong Server Library
//!
//! Authoritative server for a two-player pong match over TCP. The server owns
//! the only copy of the game, accepts exactly two participants, applies their
//! paddle commands, advances the ball on a fixed tick, and streams snapshots
//! back so every participant's display stays in sync.
//!
//! ## Architecture
//!
//! ### Task Layout
//! Everything runs on the multi-threaded tokio runtime:
//! - **Connection Manager** (`network`): accepts connections, assigns slots,
//!   rejects a third participant, and processes disconnect notifications
//! - **Connection Handlers** (`connection`): one task per participant that
//!   reads input with a short timeout and answers every iteration with a
//!   snapshot
//! - **Simulation Clock** (`clock`): advances the game about 30 times per
//!   second, independent of network activity
//!
//! ### Shared State
//! All tasks share one [`session::SharedSession`], a single lock around the
//! simulation and the slot roster. The clock and handlers only go through
//! `advance_tick`, `move_paddle` and `snapshot`; slot transitions are made by
//! the manager alone, which keeps "running iff two participants" atomic.
//!
//! ### Failure Isolation
//! A read or write failure ends only the affected handler. It reports the
//! disconnect to the manager, the slot is freed, and the surviving
//! participant simply sees `running: false` in its next snapshot.
//!
//! ## Module Organization
//!
//! - `game`: simulation state and transition rules (no I/O)
//! - `client_manager`: participant slot roster
//! - `session`: the locked shared container
//! - `clock`: ticker abstraction and the fixed-rate loop
//! - `connection`: per-participant handler
//! - `network`: listener, configuration, and manager loop
//! - `error`: server-level error type
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use pong_server::network::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind(ServerConfig::with_port(6000)).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod clock;
pub mod connection;
pub mod error;
pub mod game;
pub mod network;
pub mod session;
