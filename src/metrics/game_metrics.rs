use std::time::{Duration, Instant};

use crate::game::{GameState, StepInfo};

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub food_eaten: u64,
    pub deaths: u64,
    pub restarts: u32,
    pub longest_snake: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            food_eaten: 0,
            deaths: 0,
            restarts: 0,
            longest_snake: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_step(&mut self, state: &GameState, info: &StepInfo) {
        self.food_eaten += info.food_eaten() as u64;
        self.deaths += info.deaths().count() as u64;

        let longest = state.snakes.iter().map(|snake| snake.len()).max().unwrap_or(0);
        if longest > self.longest_snake {
            self.longest_snake = longest;
        }
    }

    pub fn on_restart(&mut self) {
        self.restarts += 1;
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
