//! Types and constants shared by the pong server and its participants.
//!
//! Both ends agree on the field geometry, the two paddle sides, the input
//! commands a participant may send, and the snapshot record the server
//! streams back. The wire codec for all of these lives in [`protocol`].

pub mod protocol;

pub use protocol::{Snapshot, SnapshotDecoder, WireError};

pub const FIELD_WIDTH: i32 = 800;
pub const FIELD_HEIGHT: i32 = 600;
pub const PADDLE_WIDTH: i32 = 15;
pub const PADDLE_HEIGHT: i32 = 100;
pub const BALL_SIZE: i32 = 10;
pub const BALL_SPEED: i32 = 5;
pub const PADDLE_STEP: i32 = 10;

/// Lowest legal paddle center
pub const PADDLE_MIN_Y: i32 = PADDLE_HEIGHT / 2;
/// Highest legal paddle center
pub const PADDLE_MAX_Y: i32 = FIELD_HEIGHT - PADDLE_HEIGHT / 2;

pub const DEFAULT_PORT: u16 = 6000;
pub const RECV_BUFFER_SIZE: usize = 1024;
pub const MAX_PARTICIPANTS: usize = 2;

/// Default simulation cadence (~30 Hz)
pub const TICK_INTERVAL_MS: u64 = 33;
/// How long a connection handler waits for input before pushing a snapshot anyway
pub const READ_TIMEOUT_MS: u64 = 100;

/// Which paddle a participant controls
///
/// Side A is the left paddle and is announced to the participant as
/// player 1, side B is the right paddle and is announced as player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    /// Player number sent over the wire
    pub fn slot(self) -> u8 {
        match self {
            Side::A => 1,
            Side::B => 2,
        }
    }

    pub fn from_slot(slot: u8) -> Option<Side> {
        match slot {
            1 => Some(Side::A),
            2 => Some(Side::B),
            _ => None,
        }
    }

    /// Zero-based position, handy for per-side arrays
    pub fn index(self) -> usize {
        self.slot() as usize - 1
    }
}

/// A paddle command. UP moves toward y = 0 (screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
}

impl Command {
    /// Parses one wire token. Anything but the exact literals is `None`.
    pub fn parse(token: &str) -> Option<Command> {
        match token {
            "up" => Some(Command::Up),
            "down" => Some(Command::Down),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Down => "down",
        }
    }

    /// Signed y delta for one step
    pub fn delta(self) -> i32 {
        match self {
            Command::Up => -PADDLE_STEP,
            Command::Down => PADDLE_STEP,
        }
    }
}

/// Clamps a paddle center into the field
pub fn clamp_paddle(y: i32) -> i32 {
    y.clamp(PADDLE_MIN_Y, PADDLE_MAX_Y)
}
