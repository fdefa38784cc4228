use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours, in `Direction::ALL` order
    pub fn neighbors(&self) -> [Position; 4] {
        Direction::ALL.map(|dir| self.moved_in_direction(dir))
    }
}

/// A snake in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Dead snakes stay on the board but never change again
    pub alive: bool,
    /// Food eaten so far
    pub score: u32,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        Self {
            body: Self::straight_body(head, direction, length),
            direction,
            alive: true,
            score: 0,
        }
    }

    /// Cells of a straight snake whose head is at `head` facing `direction`
    pub fn straight_body(head: Position, direction: Direction, length: usize) -> Vec<Position> {
        let back = direction.opposite();
        let mut body = Vec::with_capacity(length.max(1));
        body.push(head);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back));
        }

        body
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if position is any cell of the snake, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move snake in current direction, growing if should_grow is true
    pub fn move_snake(&mut self, should_grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake ran into another snake's body
    SnakeCollision { other: usize },
    /// Two heads landed on the same cell
    HeadToHead { other: usize },
}

/// Snapshot of the whole arena at one tick
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snakes: Vec<Snake>,
    pub food: Vec<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub steps: u64,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snakes: Vec<Snake>,
        food: Vec<Position>,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snakes,
            food,
            grid_width,
            grid_height,
            steps: 0,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by any snake, dead or alive
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snakes.iter().any(|snake| snake.occupies(pos))
    }

    pub fn has_food_at(&self, pos: Position) -> bool {
        self.food.contains(&pos)
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.alive).count()
    }

    pub fn all_dead(&self) -> bool {
        self.snakes.iter().all(|snake| !snake.alive)
    }

    /// Nearest food to `from` by Manhattan distance, first one wins ties
    pub fn nearest_food(&self, from: Position) -> Option<Position> {
        self.food.iter().copied().min_by_key(|food| from.manhattan(*food))
    }
}
