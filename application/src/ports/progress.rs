//! Progress notification port
//!
//! Defines the interface for reporting progress while a season runs.

use house_domain::{Phase, SeasonResult, WeekRecord};
use std::time::Duration;

/// Callback for progress updates during a season
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, log lines, etc.)
pub trait SeasonProgressNotifier: Send + Sync {
    /// Called when a phase starts, with its deadline window
    fn on_phase_start(&self, phase: &Phase, week: u32, window: Duration);

    /// Called when a phase resolves
    fn on_phase_complete(&self, phase: &Phase);

    /// Called after every eviction round
    fn on_round_complete(&self, _record: &WeekRecord) {}

    fn on_season_complete(&self, _result: &SeasonResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl SeasonProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _week: u32, _window: Duration) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
