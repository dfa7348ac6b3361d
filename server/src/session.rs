//! The single shared game instance
//!
//! One `RwLock` guards both the simulation and the slot roster, so every
//! connect/disconnect transition updates the participant count and the
//! `active` flag atomically, and every snapshot is a point-in-time copy.
//! Callers only ever see whole operations; no guard escapes this module.

use crate::client_manager::{Lobby, LobbyPhase};
use crate::game::GameState;
use pong_shared::{Command, Side, Snapshot};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Session {
    game: GameState,
    lobby: Lobby,
}

impl Session {
    fn sync_active(&mut self) {
        let active = self.lobby.is_full();
        self.game.set_active(active);
    }
}

/// Cloneable handle to the shared session
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new(game: GameState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session {
                game,
                lobby: Lobby::new(),
            })),
        }
    }

    pub async fn advance_tick(&self) {
        self.inner.write().await.game.advance_tick();
    }

    pub async fn move_paddle(&self, side: Side, command: Command) {
        self.inner.write().await.game.move_paddle(side, command);
    }

    /// Applies a batch of commands under one lock acquisition
    pub async fn apply_commands(&self, side: Side, commands: &[Command]) {
        if commands.is_empty() {
            return;
        }
        let mut session = self.inner.write().await;
        for &command in commands {
            session.game.move_paddle(side, command);
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.game.snapshot()
    }

    pub async fn participant_count(&self) -> usize {
        self.inner.read().await.lobby.len()
    }

    pub async fn phase(&self) -> LobbyPhase {
        self.inner.read().await.lobby.phase()
    }

    pub async fn is_active(&self) -> bool {
        self.inner.read().await.game.is_active()
    }

    /// Current tick, for diagnostics
    pub async fn tick(&self) -> u64 {
        self.inner.read().await.game.tick
    }

    /// Claims a slot and re-derives `active`. Connection manager only.
    pub(crate) async fn join(&self, addr: SocketAddr) -> Option<Side> {
        let mut session = self.inner.write().await;
        let side = session.lobby.join(addr)?;
        session.sync_active();
        Some(side)
    }

    /// Releases a slot and re-derives `active`. Connection manager only.
    pub(crate) async fn leave(&self, side: Side) -> bool {
        let mut session = self.inner.write().await;
        let removed = session.lobby.leave(side);
        session.sync_active();
        removed
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new(GameState::new())
    }
}
