/// Failures that end a run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Every cell is covered by a snake or food, so new food has nowhere to go
    #[error("no unoccupied cell left for food")]
    NoFreeCell,

    #[error("no room to place snake {index} at its starting length")]
    NoRoomForSnake { index: usize },

    #[error("roster has {agents} agents but the arena has {snakes} snakes")]
    RosterMismatch { snakes: usize, agents: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
