use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::bus::KeyScheme;
use crate::game::Direction;
use crate::modes::TickSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Steering key for keyboard agents listening on that scheme
    Steer(KeyScheme, Direction),
    TogglePause,
    SetSpeed(TickSpeed),
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(KeyScheme::Arrows, Direction::Up),
            KeyCode::Down => KeyAction::Steer(KeyScheme::Arrows, Direction::Down),
            KeyCode::Left => KeyAction::Steer(KeyScheme::Arrows, Direction::Left),
            KeyCode::Right => KeyAction::Steer(KeyScheme::Arrows, Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Steer(KeyScheme::Wasd, Direction::Up)
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Steer(KeyScheme::Wasd, Direction::Down)
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Steer(KeyScheme::Wasd, Direction::Left)
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Steer(KeyScheme::Wasd, Direction::Right)
            }

            // Playback
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('1') => KeyAction::SetSpeed(TickSpeed::Slow),
            KeyCode::Char('2') => KeyAction::SetSpeed(TickSpeed::Normal),
            KeyCode::Char('3') => KeyAction::SetSpeed(TickSpeed::Fast),
            KeyCode::Char('4') => KeyAction::SetSpeed(TickSpeed::VeryFast),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
