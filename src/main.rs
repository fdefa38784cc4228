use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_arena::agents::AgentKind;
use snake_arena::config::ArenaConfig;
use snake_arena::game::CollisionMode;
use snake_arena::modes::{HeadlessConfig, HeadlessMode, WatchMode};
use snake_arena::session::Session;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "snake_arena")]
#[command(version, about = "Multi-snake arena with pluggable agents")]
struct Cli {
    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "watch")]
    mode: Mode,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Food items kept on the board
    #[arg(long)]
    food: Option<usize>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Comma-separated roster, e.g. safety,greedy,arrows
    #[arg(long, value_delimiter = ',')]
    agents: Option<Vec<AgentKind>>,

    #[arg(long)]
    collision: Option<CollisionMode>,

    /// Seed for spawning, food placement and random agents
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Ticks to run in headless mode
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Write logs here while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Watch the arena in the terminal
    Watch,
    /// Run a fixed number of ticks and print a summary
    Headless,
}

impl Cli {
    fn arena_config(&self) -> Result<ArenaConfig> {
        let mut config = match &self.config {
            Some(path) => ArenaConfig::load(path)?,
            None => ArenaConfig::default(),
        };

        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(food) = self.food {
            config.game.food_count = food;
        }
        if let Some(length) = self.length {
            config.game.initial_snake_length = length;
        }
        if let Some(agents) = &self.agents {
            config.agents = agents.clone();
        }
        if let Some(collision) = self.collision {
            config.game.collision_mode = collision;
        }
        if let Some(seed) = self.seed {
            config.game.seed = Some(seed);
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }

        config.validate().context("Invalid arena configuration")?;
        Ok(config)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "snake_arena=info".into())
}

/// The TUI owns the terminal, so watch mode only logs when given a file.
fn setup_tracing(mode: Mode, log_file: Option<&PathBuf>) -> Result<()> {
    match (mode, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(env_filter())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        (Mode::Headless, None) => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        (Mode::Watch, None) => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.mode, cli.log_file.as_ref())?;

    let config = cli.arena_config()?;
    info!(
        width = config.game.grid_width,
        height = config.game.grid_height,
        agents = config.agents.len(),
        seed = ?config.game.seed,
        "Starting arena"
    );

    if cli.mode == Mode::Headless && config.agents.iter().any(AgentKind::is_keyboard) {
        warn!("Keyboard agents get no input in headless mode and will keep their heading");
    }

    let session = Session::new(config.game.clone(), &config.agents)?;

    match cli.mode {
        Mode::Watch => {
            let mut watch_mode = WatchMode::new(session, Duration::from_millis(config.tick_ms));
            watch_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless_config = HeadlessConfig::new(cli.ticks);
            if cli.tick_ms.is_some() {
                headless_config.tick_interval = Some(Duration::from_millis(config.tick_ms));
            }
            let summary = HeadlessMode::new(session, headless_config).run().await?;
            summary.print();
        }
    }

    Ok(())
}
