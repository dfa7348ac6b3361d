//! One-line text status for a terminal participant

use crate::game::ClientGameState;

/// Formats the status line shown to the participant
pub fn status_line(state: &ClientGameState) -> String {
    let player = format!("You are Player {}", state.side.slot());

    let Some(s) = state.latest else {
        return format!("{} | waiting for first update", player);
    };

    let status = if s.running {
        format!("ball ({}, {})", s.ball_x, s.ball_y)
    } else {
        "Waiting for both players to connect...".to_string()
    };

    format!(
        "{} | {} - {} | paddles {} / {} | {}",
        player, s.score1, s.score2, s.paddle1, s.paddle2, status
    )
}
