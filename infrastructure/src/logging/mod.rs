//! Logging infrastructure — structured season transcript.
//!
//! Provides [`JsonlSeasonLogger`], a JSONL file writer that implements
//! the [`SeasonLogger`](house_application::ports::season_logger::SeasonLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSeasonLogger;
