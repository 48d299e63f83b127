//! Port for structured season logging.
//!
//! Defines the [`SeasonLogger`] trait for recording season events (phase
//! transitions, competition results, nominations, votes) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the season
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured season event for logging.
pub struct SeasonEvent {
    /// Event type identifier (e.g., "phase_enter", "competition_won", "evicted").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SeasonEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging season events to a structured log.
///
/// The `log` method is synchronous and non-fallible; a failing adapter
/// drops the event rather than interrupting the season.
pub trait SeasonLogger: Send + Sync {
    fn log(&self, event: SeasonEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSeasonLogger;

impl SeasonLogger for NoSeasonLogger {
    fn log(&self, _event: SeasonEvent) {}
}
