use serde::{Deserialize, Serialize};

use super::Agent;
use crate::game::{Direction, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    /// Headings to cycle through
    pub sequence: Vec<Direction>,
    /// Ticks spent on each heading
    pub period: u32,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            sequence: vec![
                Direction::Right,
                Direction::Down,
                Direction::Left,
                Direction::Up,
            ],
            period: 4,
        }
    }
}

/// Walks a fixed loop of headings on its own clock, ignoring the board
pub struct PatternAgent {
    sequence: Vec<Direction>,
    period: u32,
    calls: u64,
}

impl PatternAgent {
    pub fn new(params: PatternParams) -> Self {
        let sequence = if params.sequence.is_empty() {
            PatternParams::default().sequence
        } else {
            params.sequence
        };

        Self {
            sequence,
            period: params.period.max(1),
            calls: 0,
        }
    }
}

impl Agent for PatternAgent {
    fn name(&self) -> &str {
        "pattern"
    }

    fn next_move(&mut self, _state: &GameState, _index: usize) -> Direction {
        let slot = (self.calls / u64::from(self.period)) as usize % self.sequence.len();
        self.calls += 1;
        self.sequence[slot]
    }
}
