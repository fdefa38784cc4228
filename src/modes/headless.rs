//! Runs the arena without a terminal UI and prints a summary at the end.
//!
//! Handy for comparing agents: with a fixed seed the whole run is
//! reproducible.

use anyhow::Result;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::session::Session;

/// Configuration for headless mode
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Number of ticks to simulate
    pub ticks: u64,
    /// Wait between ticks; `None` runs as fast as possible
    pub tick_interval: Option<Duration>,
    /// Log a progress line every N ticks (0 disables)
    pub log_frequency: u64,
}

impl HeadlessConfig {
    pub fn new(ticks: u64) -> Self {
        Self {
            ticks,
            tick_interval: None,
            log_frequency: 100,
        }
    }
}

/// Final standing of one snake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeSummary {
    pub index: usize,
    pub agent: String,
    pub length: usize,
    pub score: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub food_eaten: u64,
    pub deaths: u64,
    pub snakes: Vec<SnakeSummary>,
}

impl RunSummary {
    fn from_session(session: &Session) -> Self {
        let names = session.agent_names();
        let snakes = session
            .state()
            .snakes
            .iter()
            .enumerate()
            .map(|(index, snake)| SnakeSummary {
                index,
                agent: names.get(index).copied().unwrap_or("?").to_string(),
                length: snake.len(),
                score: snake.score,
                alive: snake.alive,
            })
            .collect();

        Self {
            steps: session.state().steps,
            food_eaten: session.metrics().food_eaten,
            deaths: session.metrics().deaths,
            snakes,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.alive).count()
    }

    pub fn print(&self) {
        println!("{}", "=".repeat(60));
        println!("Run Summary");
        println!("{}", "=".repeat(60));
        println!("Steps: {}", self.steps);
        println!("Alive: {}/{}", self.alive_count(), self.snakes.len());
        println!("Food eaten: {}", self.food_eaten);
        println!();
        println!(
            "{:>3}  {:<10} {:>6} {:>6}  {}",
            "#", "agent", "length", "food", "status"
        );
        for snake in &self.snakes {
            println!(
                "{:>3}  {:<10} {:>6} {:>6}  {}",
                snake.index,
                snake.agent,
                snake.length,
                snake.score,
                if snake.alive { "alive" } else { "dead" }
            );
        }
        println!("{}", "=".repeat(60));
    }
}

pub struct HeadlessMode {
    session: Session,
    config: HeadlessConfig,
}

impl HeadlessMode {
    pub fn new(session: Session, config: HeadlessConfig) -> Self {
        Self { session, config }
    }

    pub async fn run(&mut self) -> Result<RunSummary> {
        self.session.start()?;
        let result = self.run_ticks().await;
        self.session.stop();
        result?;

        Ok(RunSummary::from_session(&self.session))
    }

    async fn run_ticks(&mut self) -> Result<()> {
        let mut timer = self.config.tick_interval.map(interval);

        for tick in 1..=self.config.ticks {
            if let Some(timer) = timer.as_mut() {
                timer.tick().await;
            }

            self.session.tick()?;

            if self.config.log_frequency > 0 && tick % self.config.log_frequency == 0 {
                let metrics = self.session.metrics();
                info!(
                    tick,
                    alive = self.session.state().alive_count(),
                    food_eaten = metrics.food_eaten,
                    deaths = metrics.deaths,
                    "Progress"
                );
            }
        }

        Ok(())
    }
}
