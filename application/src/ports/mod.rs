//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement. Every port has a no-op implementation so a season runs
//! with nothing attached.

pub mod human_player;
pub mod presentation;
pub mod progress;
pub mod score_provider;
pub mod season_logger;
pub mod tie_break;
