//! Keyboard-free input: participant commands typed on stdin

use pong_shared::Command;

/// What a line of user input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Move(Command),
    Quit,
}

/// Turns typed lines into paddle commands
///
/// Accepts the wire tokens plus the usual single-key aliases
/// (`w`/`k` for up, `s`/`j` for down). Counts what it produced so the
/// status line can show it.
#[derive(Debug, Default)]
pub struct InputManager {
    commands_sent: u64,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps one line to an action. Unknown input yields `None`.
    pub fn parse_line(&mut self, line: &str) -> Option<InputAction> {
        let action = match line.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => InputAction::Move(Command::Up),
            "down" | "s" | "j" => InputAction::Move(Command::Down),
            "q" | "quit" | "exit" => InputAction::Quit,
            _ => return None,
        };
        if let InputAction::Move(_) = action {
            self.commands_sent += 1;
        }
        Some(action)
    }

    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }
}
