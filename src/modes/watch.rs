//! Interactive terminal view of a running arena
//!
//! # Controls
//!
//! - Arrow keys / WASD: steer keyboard-driven snakes
//! - Space: Pause/unpause
//! - R: Restart with a fresh board
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::info;

use crate::input::{InputHandler, KeyAction};
use crate::render::{Renderer, ViewStatus};
use crate::session::Session;

/// Tick rate settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSpeed {
    /// 2 Hz (500ms per tick)
    Slow,
    /// 5 Hz (200ms per tick)
    Normal,
    /// 80ms per tick
    Fast,
    /// 30ms per tick
    VeryFast,
}

impl TickSpeed {
    /// Get the tick interval for this speed
    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(200),
            Self::Fast => Duration::from_millis(80),
            Self::VeryFast => Duration::from_millis(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode {
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Period from the config; replaced once a speed key is pressed
    base_interval: Duration,
    speed: Option<TickSpeed>,
    paused: bool,
    should_quit: bool,
}

impl WatchMode {
    pub fn new(session: Session, tick_interval: Duration) -> Self {
        Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            base_interval: tick_interval,
            speed: None,
            paused: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.session.start()?;

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run loop with cleanup
        let result = self.run_loop(&mut terminal).await;

        self.session.stop();
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    fn tick_interval(&self) -> Duration {
        self.speed
            .map(|speed| speed.tick_interval())
            .unwrap_or(self.base_interval)
    }

    fn status(&self) -> ViewStatus {
        ViewStatus {
            paused: self.paused,
            speed: self.speed,
            tick_interval: self.tick_interval(),
        }
    }

    fn new_tick_timer(&self) -> Interval {
        let mut timer = interval(self.tick_interval());
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = self.new_tick_timer();

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event)? {
                            tick_timer = self.new_tick_timer();
                        }
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.session.tick()?;
                    }
                }

                _ = render_timer.tick() => {
                    self.session.metrics_mut().update();
                    let names = self.session.agent_names();
                    let status = self.status();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.session.state(),
                            &names,
                            self.session.metrics(),
                            status,
                        );
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(steps = self.session.state().steps, "Quitting");
                break;
            }
        }

        Ok(())
    }

    /// Returns true when the tick period changed
    fn handle_event(&mut self, event: Event) -> Result<bool> {
        let Event::Key(key) = event else {
            return Ok(false);
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(scheme, direction) => {
                self.session.input_mut().publish(scheme, direction);
            }
            KeyAction::TogglePause => {
                self.paused = !self.paused;
            }
            KeyAction::SetSpeed(speed) => {
                let changed = self.speed != Some(speed);
                self.speed = Some(speed);
                return Ok(changed);
            }
            KeyAction::Restart => {
                self.session.restart()?;
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(false)
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
