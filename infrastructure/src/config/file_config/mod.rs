//! Raw TOML configuration data types
//!
//! These structs mirror the config file. `[twists]` deserializes straight
//! into the domain [`TwistConfig`]; everything else has a `File*` section
//! type converted by [`FileConfig::to_season_params`].

mod durations;
mod logging;
mod output;
mod season;

pub use durations::FileDurationsConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use season::FileSeasonConfig;

use house_application::SeasonParams;
use house_domain::{MAX_ROSTER, MIN_ROSTER, TwistConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("season.roster_size must be between {min} and {max}, got {got}")]
    RosterSize { got: usize, min: usize, max: usize },

    #[error("season.pace must be a positive number, got {0}")]
    InvalidPace(f64),

    #[error("season.jury_size cannot be 0")]
    EmptyJury,

    #[error("season.veto_players must be at least 1")]
    NoVetoPlayers,

    #[error("competitor name cannot be empty")]
    EmptyName,

    #[error("durations.{0} must be a finite, non-negative number of seconds")]
    InvalidDuration(&'static str),

    #[error("twists.fast_week_factor must be in (0, 1], got {0}")]
    InvalidFastFactor(f64),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub season: FileSeasonConfig,
    pub durations: FileDurationsConfig,
    pub twists: TwistConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let season = &self.season;
        if !(MIN_ROSTER..=MAX_ROSTER).contains(&season.roster_size) {
            return Err(ConfigValidationError::RosterSize {
                got: season.roster_size,
                min: MIN_ROSTER,
                max: MAX_ROSTER,
            });
        }
        if !season.pace.is_finite() || season.pace <= 0.0 {
            return Err(ConfigValidationError::InvalidPace(season.pace));
        }
        if season.jury_size == 0 {
            return Err(ConfigValidationError::EmptyJury);
        }
        if season.veto_players == 0 {
            return Err(ConfigValidationError::NoVetoPlayers);
        }
        let names = season.names.iter().chain(season.human.iter());
        for name in names {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyName);
            }
        }

        for (field, value) in self.durations.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidDuration(field));
            }
        }

        let factor = self.twists.fast_week_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigValidationError::InvalidFastFactor(factor));
        }

        Ok(())
    }

    /// Build the scheduler parameters this file describes
    pub fn to_season_params(&self) -> SeasonParams {
        let season = &self.season;
        let mut params = SeasonParams::default()
            .with_roster_size(season.roster_size)
            .with_names(season.names.iter().cloned())
            .with_jury_size(season.jury_size)
            .with_veto_players(season.veto_players)
            .with_pace(season.pace)
            .with_presentation_fallback(Duration::from_millis(season.presentation_fallback_ms))
            .with_durations(self.durations.to_phase_durations())
            .with_twists(self.twists.clone());
        if let Some(human) = &season.human {
            params = params.with_human(human.clone());
        }
        if let Some(seed) = season.seed {
            params = params.with_seed(seed);
        }
        params
    }
}
