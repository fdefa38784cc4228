use rand::{seq::SliceRandom, Rng};

use super::{
    error::EngineError,
    state::{Position, Snake},
};

/// Cells that hold neither a snake segment nor food
pub fn free_cells(
    grid_width: usize,
    grid_height: usize,
    snakes: &[Snake],
    food: &[Position],
) -> Vec<Position> {
    let mut cells = Vec::new();

    for y in 0..grid_height as i32 {
        for x in 0..grid_width as i32 {
            let pos = Position::new(x, y);
            if !food.contains(&pos) && !snakes.iter().any(|snake| snake.occupies(pos)) {
                cells.push(pos);
            }
        }
    }

    cells
}

/// Pick a food cell uniformly among the free cells
pub fn spawn_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid_width: usize,
    grid_height: usize,
    snakes: &[Snake],
    food: &[Position],
) -> Result<Position, EngineError> {
    free_cells(grid_width, grid_height, snakes, food)
        .choose(rng)
        .copied()
        .ok_or(EngineError::NoFreeCell)
}
