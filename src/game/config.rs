use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// When self-collision and wall hits are resolved during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Walls kill immediately; self-collision is checked against the
    /// post-move body in the shared collision pass
    #[default]
    Deferred,
    /// Walls and any cell of the snake's own pre-move body kill before moving
    Immediate,
}

impl std::str::FromStr for CollisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deferred" => Ok(Self::Deferred),
            "immediate" => Ok(Self::Immediate),
            other => Err(format!(
                "unknown collision mode '{other}' (expected deferred or immediate)"
            )),
        }
    }
}

/// Configuration for the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Starting length of every snake
    pub initial_snake_length: usize,
    /// Number of food items kept on the board
    pub food_count: usize,
    pub collision_mode: CollisionMode,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            food_count: 3,
            collision_mode: CollisionMode::Deferred,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err(EngineError::InvalidConfig("grid is too large".to_string()));
        }
        if self.initial_snake_length == 0 {
            return Err(EngineError::InvalidConfig(
                "initial snake length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
