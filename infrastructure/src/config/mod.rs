//! Configuration file loading for house-game
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `HOUSE_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./house.toml` or `./.house.toml`
//! 4. Global: `$XDG_CONFIG_HOME/house-game/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDurationsConfig, FileLoggingConfig, FileOutputConfig,
    FileSeasonConfig,
};
pub use loader::ConfigLoader;
