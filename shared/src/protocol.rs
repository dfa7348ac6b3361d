//! Text wire protocol between the server and a participant
//!
//! The server opens every connection with the participant's slot number as a
//! decimal ASCII integer, then streams JSON snapshot objects. Participants
//! send bare `up` / `down` tokens. The server terminates each message with a
//! newline, but readers here never rely on it: [`SnapshotDecoder`] accepts
//! objects that arrive back to back, split across reads, or separated by
//! arbitrary whitespace.

use crate::{Command, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while encoding or decoding wire data
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid slot announcement: {0:?}")]
    InvalidSlot(String),
}

/// Full authoritative state pushed to a participant on every handler iteration
///
/// Field names are the contract; order on the wire is irrelevant and unknown
/// fields are ignored when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub paddle1: i32,
    pub paddle2: i32,
    pub ball_x: i32,
    pub ball_y: i32,
    pub score1: u32,
    pub score2: u32,
    pub running: bool,
}

/// Encodes the slot announcement sent as the very first message
pub fn encode_slot(side: Side) -> Vec<u8> {
    format!("{}\n", side.slot()).into_bytes()
}

/// Parses a complete slot announcement such as `"1"` or `"2\n"`
pub fn decode_slot(text: &str) -> Result<Side, WireError> {
    text.trim()
        .parse::<u8>()
        .ok()
        .and_then(Side::from_slot)
        .ok_or_else(|| WireError::InvalidSlot(text.to_string()))
}

pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>, WireError> {
    let mut data = serde_json::to_vec(snapshot)?;
    data.push(b'\n');
    Ok(data)
}

pub fn decode_snapshot(data: &[u8]) -> Result<Snapshot, WireError> {
    Ok(serde_json::from_slice(data)?)
}

/// Extracts the recognised commands from one read's payload
///
/// The payload is split on ASCII whitespace; every token other than the
/// exact `up` / `down` literals is dropped. Invalid UTF-8 is replaced rather
/// than rejected, so garbage never becomes an error.
pub fn parse_commands(payload: &[u8]) -> Vec<Command> {
    String::from_utf8_lossy(payload)
        .split_ascii_whitespace()
        .filter_map(Command::parse)
        .collect()
}

/// Incremental decoder for the server-to-participant byte stream
#[derive(Debug, Default)]
pub struct SnapshotDecoder {
    buffer: Vec<u8>,
}

impl SnapshotDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly received bytes
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet consumed
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Takes the leading slot announcement off the buffer
    ///
    /// Returns `Ok(None)` until at least one digit has arrived.
    pub fn next_slot(&mut self) -> Result<Option<Side>, WireError> {
        let start = self
            .buffer
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(self.buffer.len());
        let digits = self.buffer[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();

        if digits == 0 {
            if start == self.buffer.len() {
                return Ok(None);
            }
            let text = String::from_utf8_lossy(&self.buffer).into_owned();
            self.buffer.clear();
            return Err(WireError::InvalidSlot(text));
        }

        let end = start + digits;
        let text = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
        self.buffer.drain(..end);
        decode_slot(&text).map(Some)
    }

    /// Takes the next complete snapshot off the buffer
    ///
    /// Returns `Ok(None)` when only a partial object (or nothing) is buffered.
    /// On a syntax error the buffer is discarded so the stream can resync on
    /// the next read.
    pub fn next_snapshot(&mut self) -> Result<Option<Snapshot>, WireError> {
        let mut stream =
            serde_json::Deserializer::from_slice(&self.buffer).into_iter::<Snapshot>();

        match stream.next() {
            None => {
                self.buffer.clear();
                Ok(None)
            }
            Some(Ok(snapshot)) => {
                let consumed = stream.byte_offset();
                self.buffer.drain(..consumed);
                Ok(Some(snapshot))
            }
            Some(Err(e)) if e.is_eof() => Ok(None),
            Some(Err(e)) => {
                self.buffer.clear();
                Err(WireError::Json(e))
            }
        }
    }
}
