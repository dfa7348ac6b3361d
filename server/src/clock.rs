//! Fixed-rate simulation clock
//!
//! The clock is the only writer of ball motion and scores. It advances the
//! shared session once per tick of a [`Ticker`] and never touches the
//! network. Production uses a tokio [`Interval`]; tests drive it by hand.

use crate::session::SharedSession;
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Ticks logged between periodic summaries
const SUMMARY_EVERY: u64 = 300;

/// Source of tick boundaries
pub trait Ticker: Send {
    /// Waits for the next boundary. Returns false when the source is exhausted.
    fn tick(&mut self) -> impl std::future::Future<Output = bool> + Send;
}

impl Ticker for Interval {
    async fn tick(&mut self) -> bool {
        Interval::tick(self).await;
        true
    }
}

/// Ticker fed through a channel, one message per tick
impl Ticker for mpsc::Receiver<()> {
    async fn tick(&mut self) -> bool {
        self.recv().await.is_some()
    }
}

/// Wall-clock ticker at a fixed period
///
/// Late ticks are skipped rather than bursted, so a stalled runtime never
/// fast-forwards the ball.
pub fn interval_ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Runs the clock until the ticker is exhausted
///
/// With an [`Interval`] that never happens, so this runs for the process
/// lifetime. Returns the number of ticks driven.
pub async fn run_clock<T: Ticker>(session: SharedSession, mut ticker: T) -> u64 {
    let mut ticks = 0;

    while ticker.tick().await {
        session.advance_tick().await;
        ticks += 1;

        if ticks % SUMMARY_EVERY == 0 {
            let snapshot = session.snapshot().await;
            debug!(
                "Tick {}: running={}, score {} - {}",
                ticks, snapshot.running, snapshot.score1, snapshot.score2
            );
        }
    }

    ticks
}
