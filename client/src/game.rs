use log::info;
use pong_shared::{Side, Snapshot};

/// Participant-side view of the match: the latest authoritative snapshot
///
/// No prediction or smoothing happens here; the display shows exactly what
/// the server last sent.
#[derive(Debug)]
pub struct ClientGameState {
    pub side: Side,
    pub latest: Option<Snapshot>,
    pub snapshots_received: u64,
}

impl ClientGameState {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            latest: None,
            snapshots_received: 0,
        }
    }

    /// Stores a snapshot. Returns true if anything visible changed.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        self.snapshots_received += 1;

        if let Some(previous) = self.latest {
            if previous.running != snapshot.running {
                if snapshot.running {
                    info!("Both players connected, game on");
                } else {
                    info!("Waiting for both players to connect...");
                }
            }
            if (previous.score1, previous.score2) != (snapshot.score1, snapshot.score2) {
                info!("Score: {} - {}", snapshot.score1, snapshot.score2);
            }
        }

        let changed = self.latest != Some(snapshot);
        self.latest = Some(snapshot);
        changed
    }

    /// Own paddle center, if a snapshot has arrived
    pub fn own_paddle(&self) -> Option<i32> {
        self.latest.map(|s| match self.side {
            Side::A => s.paddle1,
            Side::B => s.paddle2,
        })
    }

    pub fn is_waiting(&self) -> bool {
        !self.latest.map(|s| s.running).unwrap_or(false)
    }
}
