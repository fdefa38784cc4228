//! Core arena logic for Snake
//!
//! This module contains the simulation without any I/O or rendering dependencies.
//! Every tick builds a new `GameState` from the previous one.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{CollisionMode, GameConfig};
pub use engine::{GameEngine, SnakeEvent, StepInfo};
pub use error::EngineError;
pub use state::{DeathCause, GameState, Position, Snake};
