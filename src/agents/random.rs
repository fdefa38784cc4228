use rand::{rngs::StdRng, Rng, SeedableRng};

use super::Agent;
use crate::game::{Direction, GameState};

/// Picks any of the four headings uniformly, walls and bodies included.
/// Useful as a baseline.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn next_move(&mut self, _state: &GameState, _index: usize) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }
}
