//! Infrastructure layer for house-game
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading,
//! the season random source and the JSONL season transcript.

pub mod config;
pub mod logging;
pub mod random;
pub mod score;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDurationsConfig, FileLoggingConfig,
    FileOutputConfig, FileSeasonConfig,
};
pub use logging::JsonlSeasonLogger;
pub use random::seeded_rng;
pub use score::SimulatedScoreProvider;
