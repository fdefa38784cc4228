use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;
use crate::modes::TickSpeed;

const SNAKE_COLORS: [Color; 6] = [
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::LightRed,
];

/// Playback state shown next to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewStatus {
    pub paused: bool,
    /// `None` until a speed key is pressed
    pub speed: Option<TickSpeed>,
    pub tick_interval: Duration,
}

impl ViewStatus {
    pub fn speed_label(&self) -> String {
        match self.speed {
            Some(speed) => speed.as_str().to_string(),
            None => format!("{}ms", self.tick_interval.as_millis()),
        }
    }
}

/// What to draw in one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Food,
    Head { snake: usize, alive: bool },
    Body { snake: usize, alive: bool },
}

/// Resolve a cell. Living snakes are drawn over dead ones.
pub fn cell_at(state: &GameState, pos: Position) -> Cell {
    let mut found = None;
    for (index, snake) in state.snakes.iter().enumerate() {
        let cell = if snake.head() == pos {
            Cell::Head {
                snake: index,
                alive: snake.alive,
            }
        } else if snake.occupies(pos) {
            Cell::Body {
                snake: index,
                alive: snake.alive,
            }
        } else {
            continue;
        };

        if snake.alive {
            return cell;
        }
        found.get_or_insert(cell);
    }

    match found {
        Some(cell) => cell,
        None if state.has_food_at(pos) => Cell::Food,
        None => Cell::Empty,
    }
}

pub fn snake_color(index: usize) -> Color {
    SNAKE_COLORS[index % SNAKE_COLORS.len()]
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        names: &[&str],
        metrics: &GameMetrics,
        status: ViewStatus,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and legend
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], state, metrics, status);
        frame.render_widget(stats, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(chunks[1]);

        let grid = self.render_grid(body[0], state);
        frame.render_widget(grid, body[0]);

        let legend = self.render_legend(body[1], state, names);
        frame.render_widget(legend, body[1]);

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let span = match cell_at(state, pos) {
                    Cell::Head { alive: false, .. } => {
                        Span::styled("x ", Style::default().fg(Color::DarkGray))
                    }
                    Cell::Body { alive: false, .. } => {
                        Span::styled("□ ", Style::default().fg(Color::DarkGray))
                    }
                    Cell::Head { snake, .. } => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(snake_color(snake))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::Body { snake, .. } => {
                        Span::styled("□ ", Style::default().fg(snake_color(snake)))
                    }
                    Cell::Food => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake Arena "),
            )
            .alignment(Alignment::Center)
    }

    fn render_legend(&self, _area: Rect, state: &GameState, names: &[&str]) -> Paragraph<'_> {
        let lines: Vec<Line> = state
            .snakes
            .iter()
            .enumerate()
            .map(|(index, snake)| {
                let name = names.get(index).copied().unwrap_or("?");
                let color = if snake.alive {
                    snake_color(index)
                } else {
                    Color::DarkGray
                };
                let status = if snake.alive { "" } else { " (dead)" };

                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(color)),
                    Span::styled(
                        format!("{index} {name}"),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  len {} food {}{status}", snake.len(), snake.score)),
                ])
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Snakes "),
        )
    }

    fn render_stats(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
        status: ViewStatus,
    ) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Step: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.steps.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Alive: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}/{}", state.alive_count(), state.snakes.len()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(status.speed_label(), Style::default().fg(Color::White)),
        ];

        if status.paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if state.all_dead() {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "ALL DEAD",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" steer | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
