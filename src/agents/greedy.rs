use super::Agent;
use crate::game::{Direction, GameState, Position};

/// Heads for the nearest food along the axis with the larger gap
pub struct GreedyAgent;

impl GreedyAgent {
    pub fn new() -> Self {
        Self
    }

    /// Perpendicular turn that leads away from the closer wall
    fn deflect(head: Position, blocked: Direction, state: &GameState) -> Direction {
        if blocked.is_horizontal() {
            let to_top = head.y;
            let to_bottom = state.grid_height as i32 - 1 - head.y;
            if to_top <= to_bottom {
                Direction::Down
            } else {
                Direction::Up
            }
        } else {
            let to_left = head.x;
            let to_right = state.grid_width as i32 - 1 - head.x;
            if to_left <= to_right {
                Direction::Right
            } else {
                Direction::Left
            }
        }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        "greedy"
    }

    fn next_move(&mut self, state: &GameState, index: usize) -> Direction {
        let snake = &state.snakes[index];
        let head = snake.head();

        let Some(target) = state.nearest_food(head) else {
            return snake.direction;
        };

        let dx = target.x - head.x;
        let dy = target.y - head.y;
        if dx == 0 && dy == 0 {
            return snake.direction;
        }

        let preferred = if dx.abs() >= dy.abs() {
            if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        };

        if preferred.is_opposite(snake.direction) {
            Self::deflect(head, preferred, state)
        } else {
            preferred
        }
    }
}
