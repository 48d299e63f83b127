//! Application layer for house-game
//!
//! This crate contains the season scheduler, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PhaseDurations, SeasonParams};
pub use ports::{
    human_player::{HumanPlayerPort, HumanRequest, HumanTurn, NoHumanPlayer},
    presentation::{Announcement, NoPresentation, PresentationSink, Tone},
    progress::{NoProgress, SeasonProgressNotifier},
    score_provider::{NoScoreProvider, ScoreProvider, ScoreRequest},
    season_logger::{NoSeasonLogger, SeasonEvent, SeasonLogger},
    tie_break::{NoTieBreak, TieBreakPort, TieBreakRequest},
};
pub use use_cases::run_season::{
    HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonHandle,
};
