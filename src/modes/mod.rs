pub mod headless;
pub mod watch;

pub use headless::{HeadlessConfig, HeadlessMode, RunSummary};
pub use watch::{TickSpeed, WatchMode};
