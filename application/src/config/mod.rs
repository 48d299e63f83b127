//! Application-level configuration.
//!
//! - [`SeasonParams`] — cast, jury, timing and twists for one season run
//! - [`PhaseDurations`] — base window of each phase

pub mod season_params;

pub use season_params::{PhaseDurations, SeasonParams};
