//! A single run of the arena: engine, current snapshot, agent roster and
//! the input bus the keyboard agents listen on.
//!
//! Agents are set up once in `start` and torn down once in `stop` (or on
//! drop). `restart` only replaces the board.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::agents::{Agent, AgentKind};
use crate::game::{EngineError, GameConfig, GameEngine, GameState, StepInfo};
use crate::input::InputBus;
use crate::metrics::GameMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Stopped,
}

pub struct Session {
    engine: GameEngine,
    state: GameState,
    agents: Vec<Box<dyn Agent>>,
    input: InputBus,
    metrics: GameMetrics,
    phase: Phase,
}

impl Session {
    /// Build the roster from `kinds` and lay out a fresh board
    pub fn new(config: GameConfig, kinds: &[AgentKind]) -> Result<Self> {
        let agents = kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| kind.build(config.seed, index))
            .collect();
        Self::with_agents(config, agents)
    }

    pub fn with_agents(config: GameConfig, agents: Vec<Box<dyn Agent>>) -> Result<Self> {
        if agents.is_empty() {
            return Err(EngineError::InvalidConfig(
                "at least one agent is required".to_string(),
            ))
            .context("Failed to create session");
        }

        let mut engine = GameEngine::new(config);
        let state = engine
            .reset(agents.len())
            .context("Failed to set up the arena")?;

        Ok(Self {
            engine,
            state,
            agents,
            input: InputBus::new(),
            metrics: GameMetrics::new(),
            phase: Phase::Ready,
        })
    }

    /// Run every agent's setup hook, once
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            Phase::Ready => {}
            Phase::Running => bail!("session already started"),
            Phase::Stopped => bail!("session already stopped"),
        }

        // Marked running first so a failed setup still tears down the
        // agents that did set up
        self.phase = Phase::Running;
        for index in 0..self.agents.len() {
            let agent = &mut self.agents[index];
            if let Err(err) = agent.setup(&mut self.input) {
                let name = agent.name().to_string();
                self.stop();
                return Err(err).with_context(|| format!("Failed to set up agent {index} ({name})"));
            }
        }

        info!(
            snakes = self.agents.len(),
            width = self.state.grid_width,
            height = self.state.grid_height,
            "Session started"
        );
        Ok(())
    }

    /// Advance one tick. An error here is fatal for the run.
    pub fn tick(&mut self) -> Result<StepInfo> {
        if self.phase != Phase::Running {
            bail!("session is not running ({:?})", self.phase);
        }

        let (next, info) = self
            .engine
            .step(&self.state, &mut self.agents)
            .with_context(|| format!("Tick {} failed", self.state.steps + 1))?;

        self.metrics.on_step(&next, &info);
        if !self.state.all_dead() && next.all_dead() {
            info!(steps = next.steps, "All snakes are dead");
        }
        self.state = next;

        Ok(info)
    }

    /// Lay out a fresh board; agents keep their setup
    pub fn restart(&mut self) -> Result<()> {
        self.state = self
            .engine
            .reset(self.agents.len())
            .context("Failed to reset the arena")?;
        for agent in &mut self.agents {
            agent.reset();
        }
        self.metrics.on_restart();
        info!(restarts = self.metrics.restarts, "Session restarted");
        Ok(())
    }

    /// Run every agent's teardown hook. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            for agent in &mut self.agents {
                agent.teardown(&mut self.input);
            }
            if self.input.subscriber_count() > 0 {
                warn!(
                    remaining = self.input.subscriber_count(),
                    "Input listeners left after teardown"
                );
            }
            info!(steps = self.state.steps, "Session stopped");
        }
        self.phase = Phase::Stopped;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    pub fn input_mut(&mut self) -> &mut InputBus {
        &mut self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|agent| agent.name()).collect()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
