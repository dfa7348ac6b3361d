//! Participant slot bookkeeping for the two-player server
//!
//! This module tracks which paddle slots are taken and by whom:
//! - Slot assignment on accept (lowest free slot first)
//! - Capacity enforcement (never more than two participants)
//! - Release on disconnect
//!
//! The lobby phase (`Empty`, `OnePlayer`, `TwoPlayers`) is derived from the
//! occupied slots rather than stored, so "active iff two participants" can
//! never go stale.

use log::info;
use pong_shared::{Side, MAX_PARTICIPANTS};
use std::net::SocketAddr;
use std::time::Instant;

/// Coarse lobby state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    Empty,
    OnePlayer,
    TwoPlayers,
}

/// A connected participant holding one slot
#[derive(Debug, Clone)]
pub struct Participant {
    /// Paddle this participant controls
    pub side: Side,
    /// Remote address, for logging
    pub addr: SocketAddr,
    /// When the slot was assigned
    pub joined_at: Instant,
}

/// Slot roster, capacity two
#[derive(Debug, Default)]
pub struct Lobby {
    slots: [Option<Participant>; MAX_PARTICIPANTS],
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the lowest free slot to a new participant
    ///
    /// Returns `None` when both slots are taken.
    pub fn join(&mut self, addr: SocketAddr) -> Option<Side> {
        let side = Side::ALL
            .into_iter()
            .find(|side| self.slots[side.index()].is_none())?;

        self.slots[side.index()] = Some(Participant {
            side,
            addr,
            joined_at: Instant::now(),
        });
        info!("Player {} joined from {}", side.slot(), addr);
        Some(side)
    }

    /// Frees a slot. Returns false if it was already free.
    pub fn leave(&mut self, side: Side) -> bool {
        match self.slots[side.index()].take() {
            Some(participant) => {
                info!(
                    "Player {} ({}) left after {:.1}s",
                    side.slot(),
                    participant.addr,
                    participant.joined_at.elapsed().as_secs_f32()
                );
                true
            }
            None => false,
        }
    }

    pub fn participant(&self, side: Side) -> Option<&Participant> {
        self.slots[side.index()].as_ref()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == MAX_PARTICIPANTS
    }

    pub fn phase(&self) -> LobbyPhase {
        match self.len() {
            0 => LobbyPhase::Empty,
            1 => LobbyPhase::OnePlayer,
            _ => LobbyPhase::TwoPlayers,
        }
    }
}
