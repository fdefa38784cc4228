//! Snake Arena - several snakes on one grid, each steered by its own agent
//!
//! This library provides:
//! - Core simulation (game module)
//! - Agent strategies, including keyboard-driven snakes (agents module)
//! - Key routing for keyboard agents (input module)
//! - Session lifecycle and run statistics (session, metrics modules)
//! - TUI rendering (render module)
//! - Execution modes (watch, headless)

pub mod agents;
pub mod config;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
