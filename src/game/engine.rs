use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

use super::{
    action::{Action, Direction},
    config::{CollisionMode, GameConfig},
    error::EngineError,
    food::spawn_food,
    state::{DeathCause, GameState, Position, Snake},
};
use crate::agents::Agent;

/// What happened to one snake during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnakeEvent {
    /// The agent asked for a reversal, which was ignored
    pub heading_rejected: bool,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set on the step the snake died
    pub death: Option<DeathCause>,
}

/// Information about a step, one event per snake
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    pub events: Vec<SnakeEvent>,
}

impl StepInfo {
    pub fn food_eaten(&self) -> usize {
        self.events.iter().filter(|event| event.ate_food).count()
    }

    /// Snakes that died this step, with the cause
    pub fn deaths(&self) -> impl Iterator<Item = (usize, DeathCause)> + '_ {
        self.events
            .iter()
            .enumerate()
            .filter_map(|(index, event)| event.death.map(|cause| (index, cause)))
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh arena with `snake_count` snakes and the configured food
    pub fn reset(&mut self, snake_count: usize) -> Result<GameState, EngineError> {
        self.config.validate()?;

        let mut snakes = Vec::with_capacity(snake_count);
        for index in 0..snake_count {
            let snake = self
                .spawn_snake(&snakes)
                .ok_or(EngineError::NoRoomForSnake { index })?;
            snakes.push(snake);
        }

        let mut food = Vec::with_capacity(self.config.food_count);
        for _ in 0..self.config.food_count {
            let pos = spawn_food(
                &mut self.rng,
                self.config.grid_width,
                self.config.grid_height,
                &snakes,
                &food,
            )?;
            food.push(pos);
        }

        Ok(GameState::new(
            snakes,
            food,
            self.config.grid_width,
            self.config.grid_height,
        ))
    }

    /// Query every living snake's agent, then advance the arena one tick
    pub fn step(
        &mut self,
        state: &GameState,
        agents: &mut [Box<dyn Agent>],
    ) -> Result<(GameState, StepInfo), EngineError> {
        if agents.len() != state.snakes.len() {
            return Err(EngineError::RosterMismatch {
                snakes: state.snakes.len(),
                agents: agents.len(),
            });
        }

        let actions: Vec<Action> = state
            .snakes
            .iter()
            .zip(agents.iter_mut())
            .enumerate()
            .map(|(index, (snake, agent))| {
                if snake.alive {
                    Action::Move(agent.next_move(state, index))
                } else {
                    Action::Continue
                }
            })
            .collect();

        self.advance(state, &actions)
    }

    /// Advance the arena one tick with explicit per-snake actions.
    ///
    /// Missing actions count as `Continue`. The input snapshot is left
    /// untouched; the returned state replaces it.
    pub fn advance(
        &mut self,
        state: &GameState,
        actions: &[Action],
    ) -> Result<(GameState, StepInfo), EngineError> {
        let mut next = state.clone();
        let mut events = vec![SnakeEvent::default(); state.snakes.len()];
        let mut moved = vec![false; state.snakes.len()];

        for index in 0..next.snakes.len() {
            let snake = &mut next.snakes[index];
            if !snake.alive {
                continue;
            }

            // Update direction based on action (prevent 180° turns)
            let action = actions.get(index).copied().unwrap_or(Action::Continue);
            if let Action::Move(requested) = action {
                if snake.direction.is_opposite(requested) {
                    debug!(
                        snake = index,
                        requested = ?requested,
                        current = ?snake.direction,
                        "Rejected reversal"
                    );
                    events[index].heading_rejected = true;
                } else {
                    snake.direction = requested;
                }
            }

            let new_head = snake.head().moved_in_direction(snake.direction);

            if !state.is_in_bounds(new_head) {
                snake.alive = false;
                events[index].death = Some(DeathCause::Wall);
                info!(snake = index, steps = state.steps, "Snake hit the wall");
                continue;
            }

            if self.config.collision_mode == CollisionMode::Immediate
                && state.snakes[index].occupies(new_head)
            {
                snake.alive = false;
                events[index].death = Some(DeathCause::SelfCollision);
                info!(snake = index, steps = state.steps, "Snake ran into itself");
                continue;
            }

            let ate_food = match next.food.iter().position(|food| *food == new_head) {
                Some(food_index) => {
                    // Occupancy is judged against the pre-move bodies. The
                    // eaten cell stays taken until the replacement is placed.
                    let pos = spawn_food(
                        &mut self.rng,
                        state.grid_width,
                        state.grid_height,
                        &state.snakes,
                        &next.food,
                    )?;
                    next.food.remove(food_index);
                    next.food.push(pos);
                    true
                }
                None => false,
            };

            snake.move_snake(ate_food);
            if ate_food {
                snake.score += 1;
                events[index].ate_food = true;
            }
            moved[index] = true;
        }

        let deaths = self.collision_pass(&next, &moved);
        for (index, cause) in deaths {
            next.snakes[index].alive = false;
            events[index].death = Some(cause);
            info!(snake = index, cause = ?cause, steps = state.steps, "Snake collided");
        }

        next.steps += 1;

        Ok((next, StepInfo { events }))
    }

    /// Check every snake that moved this tick against the post-move bodies.
    /// Deaths are collected first so head-to-head hits kill both sides.
    fn collision_pass(&self, next: &GameState, moved: &[bool]) -> Vec<(usize, DeathCause)> {
        let mut deaths = Vec::new();

        for (index, snake) in next.snakes.iter().enumerate() {
            if !moved[index] {
                continue;
            }
            let head = snake.head();

            if self.config.collision_mode == CollisionMode::Deferred
                && snake.collides_with_body(head)
            {
                deaths.push((index, DeathCause::SelfCollision));
                continue;
            }

            let hit = next
                .snakes
                .iter()
                .enumerate()
                .filter(|(other_index, _)| *other_index != index)
                .find_map(|(other_index, other)| {
                    if other.alive && other.head() == head {
                        Some(DeathCause::HeadToHead { other: other_index })
                    } else if other.occupies(head) {
                        Some(DeathCause::SnakeCollision { other: other_index })
                    } else {
                        None
                    }
                });

            if let Some(cause) = hit {
                deaths.push((index, cause));
            }
        }

        deaths
    }

    /// Place a straight snake on a random free line with an open cell in
    /// front of the head
    fn spawn_snake(&mut self, others: &[Snake]) -> Option<Snake> {
        let length = self.config.initial_snake_length;

        self.spawn_candidates(others)
            .choose(&mut self.rng)
            .map(|&(head, direction)| Snake::new(head, direction, length))
    }

    fn spawn_candidates(&self, others: &[Snake]) -> Vec<(Position, Direction)> {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;
        // The cell ahead of an earlier snake is kept clear as well
        let free = |pos: &Position| {
            pos.x >= 0
                && pos.x < width
                && pos.y >= 0
                && pos.y < height
                && !others.iter().any(|snake| {
                    snake.occupies(*pos)
                        || snake.head().moved_in_direction(snake.direction) == *pos
                })
        };

        let mut candidates = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let head = Position::new(x, y);
                for direction in Direction::ALL {
                    let body = Snake::straight_body(
                        head,
                        direction,
                        self.config.initial_snake_length,
                    );
                    if free(&head.moved_in_direction(direction)) && body.iter().all(|pos| free(pos)) {
                        candidates.push((head, direction));
                    }
                }
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(mode: CollisionMode) -> GameEngine {
        let mut config = GameConfig::small().with_seed(11);
        config.collision_mode = mode;
        GameEngine::new(config)
    }

    fn snake_from(body: &[(i32, i32)], direction: Direction) -> Snake {
        Snake {
            body: body.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            direction,
            alive: true,
            score: 0,
        }
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(5));
        let state = engine.reset(4).unwrap();

        assert_eq!(state.steps, 0);
        assert_eq!(state.snakes.len(), 4);
        assert_eq!(state.food.len(), 3);

        for (index, snake) in state.snakes.iter().enumerate() {
            assert!(snake.alive);
            assert_eq!(snake.len(), 3);
            assert!(snake.body.iter().all(|pos| state.is_in_bounds(*pos)));
            for other in &state.snakes[index + 1..] {
                assert!(snake.body.iter().all(|pos| !other.occupies(*pos)));
            }
        }
        for food in &state.food {
            assert!(!state.is_occupied_by_snake(*food));
        }
    }

    #[test]
    fn test_reset_is_deterministic_with_seed() {
        let a = GameEngine::new(GameConfig::default().with_seed(9)).reset(3).unwrap();
        let b = GameEngine::new(GameConfig::default().with_seed(9)).reset(3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reset_fails_without_room() {
        // A length-2 snake plus its front cell needs three cells in a row,
        // so a 4x2 board fits one snake per row and nothing else
        let mut config = GameConfig::new(4, 2).with_seed(1);
        config.initial_snake_length = 2;
        config.food_count = 0;
        let mut engine = GameEngine::new(config);

        assert_eq!(
            engine.reset(3),
            Err(EngineError::NoRoomForSnake { index: 2 })
        );
    }

    #[test]
    fn test_reset_needs_an_open_front_cell() {
        // A length-3 line fills a whole 3x3 row, leaving no cell ahead
        for seed in 0..20 {
            let mut config = GameConfig::new(3, 3).with_seed(seed);
            config.initial_snake_length = 3;
            config.food_count = 0;

            assert_eq!(
                GameEngine::new(config).reset(1),
                Err(EngineError::NoRoomForSnake { index: 0 })
            );
        }
    }

    #[test]
    fn test_spawned_snakes_face_a_free_cell() {
        for seed in 0..20 {
            let mut config = GameConfig::new(8, 8).with_seed(seed);
            config.food_count = 0;
            let state = GameEngine::new(config).reset(4).unwrap();

            for snake in &state.snakes {
                let front = snake.head().moved_in_direction(snake.direction);
                assert!(state.is_in_bounds(front));
                assert!(!state.is_occupied_by_snake(front));
            }
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(CollisionMode::Deferred);
        let state = GameState::new(
            vec![Snake::new(Position::new(5, 5), Direction::Right, 3)],
            vec![Position::new(0, 0)],
            10,
            10,
        );

        let (next, info) = engine.advance(&state, &[Action::Continue]).unwrap();

        assert_eq!(next.steps, 1);
        assert_eq!(next.snakes[0].head(), Position::new(6, 5));
        assert_eq!(next.snakes[0].len(), 3);
        assert_eq!(info.events[0], SnakeEvent::default());
        // Previous snapshot is untouched
        assert_eq!(state.steps, 0);
        assert_eq!(state.snakes[0].head(), Position::new(5, 5));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(CollisionMode::Deferred);
        let food = Position::new(6, 5);
        let state = GameState::new(
            vec![Snake::new(Position::new(5, 5), Direction::Right, 3)],
            vec![food, Position::new(0, 0)],
            10,
            10,
        );

        let (next, info) = engine.advance(&state, &[Action::Continue]).unwrap();

        assert!(info.events[0].ate_food);
        assert_eq!(info.food_eaten(), 1);
        assert_eq!(next.snakes[0].len(), 4);
        assert_eq!(next.snakes[0].score, 1);
        assert_eq!(next.food.len(), 2);
        assert!(!next.food.contains(&food));
        for pos in &next.food {
            assert!(!state.is_occupied_by_snake(*pos));
        }
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(CollisionMode::Deferred);
        let state = GameState::new(
            vec![Snake::new(Position::new(0, 5), Direction::Left, 3)],
            vec![Position::new(5, 5)],
            10,
            10,
        );

        let (next, info) = engine.advance(&state, &[Action::Continue]).unwrap();

        assert!(!next.snakes[0].alive);
        assert_eq!(next.snakes[0].body, state.snakes[0].body);
        assert_eq!(info.events[0].death, Some(DeathCause::Wall));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(CollisionMode::Deferred);
        // Hook shape: turning right lands on a middle segment
        let snake = snake_from(&[(2, 2), (2, 3), (3, 3), (3, 2), (3, 1)], Direction::Up);
        let state = GameState::new(vec![snake], vec![Position::new(8, 8)], 10, 10);

        let (next, info) = engine
            .advance(&state, &[Action::Move(Direction::Right)])
            .unwrap();

        assert!(!next.snakes[0].alive);
        assert_eq!(info.events[0].death, Some(DeathCause::SelfCollision));
    }

    #[test]
    fn test_chasing_own_tail_is_safe_when_deferred() {
        let mut engine = engine(CollisionMode::Deferred);
        let snake = snake_from(&[(2, 2), (2, 3), (3, 3), (3, 2)], Direction::Up);
        let state = GameState::new(vec![snake], vec![Position::new(8, 8)], 10, 10);

        let (next, info) = engine
            .advance(&state, &[Action::Move(Direction::Right)])
            .unwrap();

        assert!(next.snakes[0].alive);
        assert_eq!(next.snakes[0].head(), Position::new(3, 2));
        assert_eq!(info.events[0].death, None);
    }

    #[test]
    fn test_chasing_own_tail_while_eating_is_fatal() {
        let mut engine = engine(CollisionMode::Deferred);
        let snake = snake_from(&[(2, 2), (2, 3), (3, 3), (3, 2)], Direction::Up);
        let state = GameState::new(vec![snake], vec![Position::new(3, 2)], 10, 10);

        let (next, info) = engine
            .advance(&state, &[Action::Move(Direction::Right)])
            .unwrap();

        assert!(info.events[0].ate_food);
        assert!(!next.snakes[0].alive);
        assert_eq!(info.events[0].death, Some(DeathCause::SelfCollision));
    }

    #[test]
    fn test_chasing_own_tail_is_fatal_when_immediate() {
        let mut engine = engine(CollisionMode::Immediate);
        let snake = snake_from(&[(2, 2), (2, 3), (3, 3), (3, 2)], Direction::Up);
        let state = GameState::new(vec![snake], vec![Position::new(8, 8)], 10, 10);

        let (next, info) = engine
            .advance(&state, &[Action::Move(Direction::Right)])
            .unwrap();

        assert!(!next.snakes[0].alive);
        assert_eq!(next.snakes[0].body, state.snakes[0].body);
        assert_eq!(info.events[0].death, Some(DeathCause::SelfCollision));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(CollisionMode::Deferred);
        let state = GameState::new(
            vec![Snake::new(Position::new(5, 5), Direction::Right, 3)],
            vec![Position::new(0, 0)],
            10,
            10,
        );

        // Try to turn 180 degrees (should be ignored)
        let (next, info) = engine
            .advance(&state, &[Action::Move(Direction::Left)])
            .unwrap();

        assert!(info.events[0].heading_rejected);
        assert_eq!(next.snakes[0].direction, Direction::Right);
        assert_eq!(next.snakes[0].head(), Position::new(6, 5));
    }

    #[test]
    fn test_head_to_head_kills_both() {
        let mut engine = engine(CollisionMode::Deferred);
        let state = GameState::new(
            vec![
                Snake::new(Position::new(2, 5), Direction::Right, 2),
                Snake::new(Position::new(4, 5), Direction::Left, 2),
            ],
            vec![Position::new(0, 0)],
            10,
            10,
        );

        let (next, info) = engine
            .advance(&state, &[Action::Continue, Action::Continue])
            .unwrap();

        assert!(next.all_dead());
        assert_eq!(
            info.events[0].death,
            Some(DeathCause::HeadToHead { other: 1 })
        );
        assert_eq!(
            info.events[1].death,
            Some(DeathCause::HeadToHead { other: 0 })
        );
    }

    #[test]
    fn test_body_collision_uses_post_move_bodies() {
        let mut engine = engine(CollisionMode::Deferred);
        // Snake 1 leaves (3, 5) behind as it moves up, snake 0 takes it
        let state = GameState::new(
            vec![
                Snake::new(Position::new(2, 5), Direction::Right, 2),
                snake_from(&[(3, 3), (3, 4), (3, 5)], Direction::Up),
            ],
            vec![Position::new(0, 0)],
            10,
            10,
        );

        let (next, _) = engine
            .advance(&state, &[Action::Continue, Action::Continue])
            .unwrap();
        assert_eq!(next.alive_count(), 2);

        // One cell further along, snake 0 now runs into snake 1's body
        let state = GameState::new(
            vec![
                Snake::new(Position::new(2, 5), Direction::Right, 2),
                snake_from(&[(3, 4), (3, 5), (3, 6)], Direction::Up),
            ],
            vec![Position::new(0, 0)],
            10,
            10,
        );

        let (next, info) = engine
            .advance(&state, &[Action::Continue, Action::Continue])
            .unwrap();
        assert!(!next.snakes[0].alive);
        assert!(next.snakes[1].alive);
        assert_eq!(
            info.events[0].death,
            Some(DeathCause::SnakeCollision { other: 1 })
        );
    }

    #[test]
    fn test_dead_snakes_are_frozen_but_still_block() {
        let mut engine = engine(CollisionMode::Deferred);
        let mut dead = snake_from(&[(4, 5), (4, 6)], Direction::Up);
        dead.alive = false;
        let state = GameState::new(
            vec![Snake::new(Position::new(2, 5), Direction::Right, 2), dead.clone()],
            vec![Position::new(0, 0)],
            10,
            10,
        );

        let (next, _) = engine
            .advance(&state, &[Action::Continue, Action::Move(Direction::Left)])
            .unwrap();
        assert_eq!(next.snakes[1], dead);
        assert!(next.snakes[0].alive);

        let (next, info) = engine
            .advance(&next, &[Action::Continue, Action::Continue])
            .unwrap();
        assert_eq!(next.snakes[1], dead);
        assert!(!next.snakes[0].alive);
        assert_eq!(
            info.events[0].death,
            Some(DeathCause::SnakeCollision { other: 1 })
        );
    }

    #[test]
    fn test_steps_advance_after_everyone_died() {
        let mut engine = engine(CollisionMode::Deferred);
        let mut dead = Snake::new(Position::new(5, 5), Direction::Right, 3);
        dead.alive = false;
        let state = GameState::new(vec![dead], vec![Position::new(0, 0)], 10, 10);

        let (next, info) = engine.advance(&state, &[Action::Continue]).unwrap();

        assert_eq!(next.steps, 1);
        assert_eq!(next.snakes, state.snakes);
        assert_eq!(next.food, state.food);
        assert_eq!(info.deaths().count(), 0);
    }

    #[test]
    fn test_no_free_cell_is_fatal() {
        let mut engine = engine(CollisionMode::Deferred);
        let snake = snake_from(&[(0, 0), (0, 1)], Direction::Right);
        let state = GameState::new(
            vec![snake],
            vec![Position::new(1, 0), Position::new(1, 1)],
            2,
            2,
        );

        assert_eq!(
            engine.advance(&state, &[Action::Continue]),
            Err(EngineError::NoFreeCell)
        );
    }

    #[test]
    fn test_roster_mismatch() {
        let mut engine = engine(CollisionMode::Deferred);
        let state = GameState::new(
            vec![Snake::new(Position::new(5, 5), Direction::Right, 3)],
            vec![],
            10,
            10,
        );

        assert_eq!(
            engine.step(&state, &mut []),
            Err(EngineError::RosterMismatch {
                snakes: 1,
                agents: 0
            })
        );
    }
}
