use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agents::{AgentKind, PatternParams, SafetyParams};
use crate::game::{EngineError, GameConfig};

/// Everything needed to start a run, as stored in a TOML file
///
/// ```toml
/// tick_ms = 150
///
/// [game]
/// grid_width = 24
/// grid_height = 16
/// food_count = 4
/// collision_mode = "immediate"
///
/// [[agents]]
/// kind = "safety"
/// space_weight = 5.0
///
/// [[agents]]
/// kind = "keyboard"
/// scheme = "wasd"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub game: GameConfig,
    pub agents: Vec<AgentKind>,
    /// Milliseconds between ticks in watch mode
    pub tick_ms: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            agents: vec![
                AgentKind::Safety(SafetyParams::default()),
                AgentKind::Greedy,
                AgentKind::Random,
                AgentKind::Pattern(PatternParams::default()),
            ],
            tick_ms: 200,
        }
    }
}

impl ArenaConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.game.validate()?;
        if self.agents.is_empty() {
            return Err(EngineError::InvalidConfig(
                "at least one agent is required".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "tick_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CollisionMode;
    use crate::input::KeyScheme;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_roster() {
        let config = ArenaConfig::default();
        assert_eq!(config.agents.len(), 4);
        assert_eq!(config.tick_ms, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
tick_ms = 150

[game]
grid_width = 24
grid_height = 16
food_count = 4
collision_mode = "immediate"
seed = 99

[[agents]]
kind = "safety"
space_weight = 5.0

[[agents]]
kind = "pattern"
sequence = ["up", "left"]

[[agents]]
kind = "keyboard"
scheme = "wasd"

[[agents]]
kind = "greedy"
"#
        )
        .unwrap();

        let config = ArenaConfig::load(file.path()).unwrap();

        assert_eq!(config.tick_ms, 150);
        assert_eq!(config.game.grid_width, 24);
        assert_eq!(config.game.grid_height, 16);
        assert_eq!(config.game.food_count, 4);
        assert_eq!(config.game.initial_snake_length, 3);
        assert_eq!(config.game.collision_mode, CollisionMode::Immediate);
        assert_eq!(config.game.seed, Some(99));
        assert_eq!(
            config.agents[0],
            AgentKind::Safety(SafetyParams {
                space_weight: 5.0,
                ..SafetyParams::default()
            })
        );
        assert_eq!(
            config.agents[1],
            AgentKind::Pattern(PatternParams {
                sequence: vec![crate::game::Direction::Up, crate::game::Direction::Left],
                ..PatternParams::default()
            })
        );
        assert_eq!(
            config.agents[2],
            AgentKind::Keyboard {
                scheme: KeyScheme::Wasd
            }
        );
        assert_eq!(config.agents[3], AgentKind::Greedy);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tick_ms = 80").unwrap();

        let config = ArenaConfig::load(file.path()).unwrap();

        assert_eq!(config.tick_ms, 80);
        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.agents, ArenaConfig::default().agents);
    }

    #[test]
    fn test_rejects_empty_roster() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "agents = []").unwrap();

        assert!(ArenaConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArenaConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
