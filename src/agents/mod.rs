//! Strategies that steer snakes.
//!
//! Every snake in the arena is driven by one `Agent`. The roster is built
//! from `AgentKind` values taken from the config file or the command line.

pub mod greedy;
pub mod keyboard;
pub mod pattern;
pub mod random;
pub mod safety;

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::game::{Direction, GameState};
use crate::input::{InputBus, KeyScheme};

pub use greedy::GreedyAgent;
pub use keyboard::KeyboardAgent;
pub use pattern::{PatternAgent, PatternParams};
pub use random::RandomAgent;
pub use safety::{SafetyAgent, SafetyParams};

/// Decides the next heading for one snake.
///
/// The engine only calls `next_move` for living snakes, in snake-index order.
/// A returned reversal is silently replaced by the current heading.
pub trait Agent {
    fn name(&self) -> &str;

    fn next_move(&mut self, state: &GameState, index: usize) -> Direction;

    /// Called once when the session starts
    fn setup(&mut self, _input: &mut InputBus) -> Result<()> {
        Ok(())
    }

    /// Called when the board is replaced; per-game state goes here
    fn reset(&mut self) {}

    /// Called once when the session stops
    fn teardown(&mut self, _input: &mut InputBus) {}
}

/// Agent selection as it appears in config files and on the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentKind {
    Pattern(PatternParams),
    Random,
    Greedy,
    Safety(SafetyParams),
    Keyboard {
        #[serde(default)]
        scheme: KeyScheme,
    },
}

impl AgentKind {
    /// Build the agent for snake `index`. Seeded agents derive their own
    /// seed from the arena seed so runs are reproducible.
    pub fn build(&self, seed: Option<u64>, index: usize) -> Box<dyn Agent> {
        match self {
            AgentKind::Pattern(params) => Box::new(PatternAgent::new(params.clone())),
            AgentKind::Random => {
                let seed = seed.map(|seed| seed.wrapping_add(index as u64 + 1));
                Box::new(RandomAgent::new(seed))
            }
            AgentKind::Greedy => Box::new(GreedyAgent::new()),
            AgentKind::Safety(params) => Box::new(SafetyAgent::new(params.clone())),
            AgentKind::Keyboard { scheme } => Box::new(KeyboardAgent::new(*scheme)),
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, AgentKind::Keyboard { .. })
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Pattern(_) => write!(f, "pattern"),
            AgentKind::Random => write!(f, "random"),
            AgentKind::Greedy => write!(f, "greedy"),
            AgentKind::Safety(_) => write!(f, "safety"),
            AgentKind::Keyboard { scheme: KeyScheme::Arrows } => write!(f, "arrows"),
            AgentKind::Keyboard { scheme: KeyScheme::Wasd } => write!(f, "wasd"),
        }
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(AgentKind::Pattern(PatternParams::default())),
            "random" => Ok(AgentKind::Random),
            "greedy" => Ok(AgentKind::Greedy),
            "safety" => Ok(AgentKind::Safety(SafetyParams::default())),
            "keyboard" | "arrows" => Ok(AgentKind::Keyboard {
                scheme: KeyScheme::Arrows,
            }),
            "wasd" => Ok(AgentKind::Keyboard {
                scheme: KeyScheme::Wasd,
            }),
            other => Err(format!(
                "unknown agent '{other}' (expected pattern, random, greedy, safety, arrows or wasd)"
            )),
        }
    }
}
