use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::Agent;
use crate::game::{Direction, GameState, Position};

/// Weights and search limits for `SafetyAgent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyParams {
    pub safety_weight: f64,
    pub food_weight: f64,
    pub space_weight: f64,
    /// Flood fill stops expanding past this many steps from the candidate
    pub max_depth: usize,
    /// Flood fill stops after visiting this many cells
    pub node_budget: usize,
}

impl Default for SafetyParams {
    fn default() -> Self {
        Self {
            safety_weight: 10.0,
            food_weight: 1.0,
            space_weight: 3.0,
            max_depth: 12,
            node_budget: 128,
        }
    }
}

/// Scores each legal heading on collision safety, food distance and open
/// space, then takes the best one
pub struct SafetyAgent {
    params: SafetyParams,
}

/// Per-heading breakdown, kept separate for testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveScore {
    pub direction: Direction,
    pub safety: f64,
    pub food: f64,
    pub space: f64,
    pub total: f64,
}

impl SafetyAgent {
    pub fn new(params: SafetyParams) -> Self {
        Self {
            params: SafetyParams {
                node_budget: params.node_budget.max(1),
                ..params
            },
        }
    }

    /// Cells that will still be covered next tick. Living snakes drag their
    /// tail along, so tails are left out.
    fn blocked_cells(state: &GameState) -> HashSet<Position> {
        let mut blocked = HashSet::new();
        for snake in &state.snakes {
            let keep = if snake.alive && snake.len() > 1 {
                snake.len() - 1
            } else {
                snake.len()
            };
            blocked.extend(snake.body.iter().take(keep).copied());
        }
        blocked
    }

    pub fn score_moves(&self, state: &GameState, index: usize) -> Vec<MoveScore> {
        let me = &state.snakes[index];
        let blocked = Self::blocked_cells(state);

        Direction::ALL
            .into_iter()
            .filter(|direction| !direction.is_opposite(me.direction))
            .map(|direction| {
                let cell = me.head().moved_in_direction(direction);

                let safety = if !state.is_in_bounds(cell) || blocked.contains(&cell) {
                    -1.0
                } else if self.head_to_head_risk(state, index, cell) {
                    0.5
                } else {
                    1.0
                };

                let food = state
                    .nearest_food(cell)
                    .map(|food| 1.0 / (1.0 + f64::from(cell.manhattan(food))))
                    .unwrap_or(0.0);

                let space = if safety < 0.0 {
                    0.0
                } else {
                    self.reachable_space(state, &blocked, cell) as f64
                        / self.params.node_budget as f64
                };

                let total = self.params.safety_weight * safety
                    + self.params.food_weight * food
                    + self.params.space_weight * space;

                MoveScore {
                    direction,
                    safety,
                    food,
                    space,
                    total,
                }
            })
            .collect()
    }

    /// An equal or longer rival could move its head onto `cell` this tick
    fn head_to_head_risk(&self, state: &GameState, index: usize, cell: Position) -> bool {
        let my_len = state.snakes[index].len();
        state
            .snakes
            .iter()
            .enumerate()
            .filter(|(other, snake)| *other != index && snake.alive && snake.len() >= my_len)
            .any(|(_, snake)| snake.head().manhattan(cell) == 1)
    }

    /// Bounded BFS over free cells starting at `start`
    fn reachable_space(
        &self,
        state: &GameState,
        blocked: &HashSet<Position>,
        start: Position,
    ) -> usize {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);

        while let Some((pos, depth)) = queue.pop_front() {
            if depth >= self.params.max_depth {
                continue;
            }
            for next in pos.neighbors() {
                if visited.len() >= self.params.node_budget {
                    return visited.len();
                }
                if !state.is_in_bounds(next) || blocked.contains(&next) || !visited.insert(next) {
                    continue;
                }
                queue.push_back((next, depth + 1));
            }
        }

        visited.len()
    }
}

impl Default for SafetyAgent {
    fn default() -> Self {
        Self::new(SafetyParams::default())
    }
}

impl Agent for SafetyAgent {
    fn name(&self) -> &str {
        "safety"
    }

    fn next_move(&mut self, state: &GameState, index: usize) -> Direction {
        let mut best: Option<MoveScore> = None;
        for score in self.score_moves(state, index) {
            if best.map_or(true, |best| score.total > best.total) {
                best = Some(score);
            }
        }

        best.map(|best| best.direction)
            .unwrap_or(state.snakes[index].direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Snake;

    fn snake_from(body: &[(i32, i32)], direction: Direction) -> Snake {
        Snake {
            body: body.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            direction,
            alive: true,
            score: 0,
        }
    }

    #[test]
    fn test_never_offers_reversal() {
        let agent = SafetyAgent::default();
        let state = GameState::new(
            vec![Snake::new(Position::new(5, 5), Direction::Right, 3)],
            vec![],
            10,
            10,
        );

        let scores = agent.score_moves(&state, 0);
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|score| score.direction != Direction::Left));
    }

    #[test]
    fn test_avoids_wall() {
        let mut agent = SafetyAgent::default();
        // Straight ahead is the wall
        let state = GameState::new(
            vec![Snake::new(Position::new(9, 5), Direction::Right, 3)],
            vec![],
            10,
            10,
        );

        let choice = agent.next_move(&state, 0);
        assert!(choice == Direction::Up || choice == Direction::Down);
    }

    #[test]
    fn test_avoids_other_body() {
        let mut agent = SafetyAgent::default();
        let state = GameState::new(
            vec![
                Snake::new(Position::new(2, 5), Direction::Right, 2),
                snake_from(&[(3, 2), (3, 3), (3, 4), (3, 5), (3, 6), (3, 7)], Direction::Up),
            ],
            vec![Position::new(5, 5)],
            10,
            10,
        );

        assert_ne!(agent.next_move(&state, 0), Direction::Right);
    }

    #[test]
    fn test_tail_cells_are_free() {
        let agent = SafetyAgent::default();
        let state = GameState::new(
            vec![snake_from(&[(2, 2), (2, 3), (3, 3), (3, 2)], Direction::Up)],
            vec![],
            10,
            10,
        );

        let right = agent
            .score_moves(&state, 0)
            .into_iter()
            .find(|score| score.direction == Direction::Right)
            .unwrap();
        assert_eq!(right.safety, 1.0);
    }

    #[test]
    fn test_head_to_head_risk_with_longer_rival() {
        let agent = SafetyAgent::default();
        // Rival's head sits next to the cell above us
        let state = GameState::new(
            vec![
                Snake::new(Position::new(5, 5), Direction::Up, 2),
                Snake::new(Position::new(6, 4), Direction::Up, 4),
            ],
            vec![],
            12,
            12,
        );

        let up = agent
            .score_moves(&state, 0)
            .into_iter()
            .find(|score| score.direction == Direction::Up)
            .unwrap();
        assert_eq!(up.safety, 0.5);

        // The longer rival sees no risk from the shorter one
        let rival_scores = agent.score_moves(&state, 1);
        assert!(rival_scores.iter().all(|score| score.safety != 0.5));
    }

    #[test]
    fn test_prefers_open_space_over_dead_end() {
        let mut agent = SafetyAgent::new(SafetyParams {
            food_weight: 0.0,
            ..SafetyParams::default()
        });
        // A wall of body cells seals the single column to the left (x=0)
        let wall: Vec<(i32, i32)> = (0..10).map(|y| (1, 9 - y)).collect();
        let mut blocker = snake_from(&wall, Direction::Up);
        blocker.alive = false;
        let state = GameState::new(
            vec![
                snake_from(&[(2, 5), (2, 6)], Direction::Up),
                blocker,
            ],
            vec![],
            10,
            10,
        );

        let scores = agent.score_moves(&state, 0);
        let right = scores.iter().find(|s| s.direction == Direction::Right).unwrap();
        let left = scores.iter().find(|s| s.direction == Direction::Left).unwrap();
        assert!(right.space > 0.5);
        assert_eq!(left.safety, -1.0);
        assert_ne!(agent.next_move(&state, 0), Direction::Left);
    }

    #[test]
    fn test_flood_fill_respects_budget() {
        let agent = SafetyAgent::new(SafetyParams {
            node_budget: 5,
            ..SafetyParams::default()
        });
        let state = GameState::new(vec![], vec![], 20, 20);

        let reached = agent.reachable_space(&state, &HashSet::new(), Position::new(10, 10));
        assert_eq!(reached, 5);
    }

    #[test]
    fn test_flood_fill_respects_depth() {
        let agent = SafetyAgent::new(SafetyParams {
            max_depth: 1,
            ..SafetyParams::default()
        });
        let state = GameState::new(vec![], vec![], 20, 20);

        let reached = agent.reachable_space(&state, &HashSet::new(), Position::new(10, 10));
        assert_eq!(reached, 5);
    }
}
