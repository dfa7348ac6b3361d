//! Authoritative pong simulation
//!
//! Pure data plus transition logic. Nothing in here performs I/O or locking;
//! [`crate::session`] wraps a [`GameState`] behind the shared lock.

use log::info;
use pong_shared::{
    clamp_paddle, Command, Side, Snapshot, BALL_SIZE, BALL_SPEED, FIELD_HEIGHT, FIELD_WIDTH,
    PADDLE_HEIGHT, PADDLE_WIDTH,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BALL_RADIUS: i32 = BALL_SIZE / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub tick: u64,
    paddles: [i32; 2],
    ball: Ball,
    scores: [u32; 2],
    active: bool,
    rng: StdRng,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic state for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let ball = Self::serve(&mut rng);
        Self {
            tick: 0,
            paddles: [FIELD_HEIGHT / 2; 2],
            ball,
            scores: [0; 2],
            active: false,
            rng,
        }
    }

    /// Ball at field center with a random sign on each velocity component
    fn serve(rng: &mut StdRng) -> Ball {
        let vx = if rng.gen_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        let vy = if rng.gen_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        Ball {
            x: FIELD_WIDTH / 2,
            y: FIELD_HEIGHT / 2,
            vx,
            vy,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn paddle(&self, side: Side) -> i32 {
        self.paddles[side.index()]
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    /// Advances one fixed step. Does nothing while the game is inactive.
    ///
    /// Checks run in a fixed order against the freshly integrated position:
    /// wall bounce, paddle bounce, then scoring.
    pub fn advance_tick(&mut self) {
        if !self.active {
            return;
        }

        self.tick += 1;
        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;

        self.bounce_off_walls();
        self.bounce_off_paddles();
        self.check_scoring();
    }

    fn bounce_off_walls(&mut self) {
        let ball = &mut self.ball;
        let hits_top = ball.y - BALL_RADIUS <= 0 && ball.vy < 0;
        let hits_bottom = ball.y + BALL_RADIUS >= FIELD_HEIGHT && ball.vy > 0;
        if hits_top || hits_bottom {
            ball.vy = -ball.vy;
        }
    }

    fn bounce_off_paddles(&mut self) {
        let half = PADDLE_HEIGHT / 2;
        let ball = &mut self.ball;

        let left = self.paddles[Side::A.index()];
        if ball.vx < 0 && ball.x - BALL_RADIUS <= PADDLE_WIDTH && (ball.y - left).abs() <= half {
            ball.vx = -ball.vx;
        }

        let right = self.paddles[Side::B.index()];
        if ball.vx > 0
            && ball.x + BALL_RADIUS >= FIELD_WIDTH - PADDLE_WIDTH
            && (ball.y - right).abs() <= half
        {
            ball.vx = -ball.vx;
        }
    }

    fn check_scoring(&mut self) {
        let scorer = if self.ball.x < 0 {
            Side::B
        } else if self.ball.x > FIELD_WIDTH {
            Side::A
        } else {
            return;
        };

        self.scores[scorer.index()] += 1;
        self.ball = Self::serve(&mut self.rng);
        info!(
            "Player {} scored ({} - {})",
            scorer.slot(),
            self.scores[0],
            self.scores[1]
        );
    }

    /// Moves one paddle a fixed step and clamps it into the field
    ///
    /// Paddles are frozen while the game is inactive.
    pub fn move_paddle(&mut self, side: Side, command: Command) {
        if !self.active {
            return;
        }
        let paddle = &mut self.paddles[side.index()];
        *paddle = clamp_paddle(*paddle + command.delta());
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            paddle1: self.paddles[0],
            paddle2: self.paddles[1],
            ball_x: self.ball.x,
            ball_y: self.ball.y,
            score1: self.scores[0],
            score2: self.scores[1],
            running: self.active,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
