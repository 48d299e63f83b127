//! Presentation layer for house-game
//!
//! This crate contains CLI definitions, the console narration sink,
//! progress reporters, terminal input for a human player, and the
//! formatters for the finished season.

pub mod cli;
pub mod human;
pub mod output;
pub mod progress;
pub mod sink;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use human::console::{ConsoleHumanDriver, ConsoleHumanPlayer, TurnEvent};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use sink::console::ConsolePresentation;
