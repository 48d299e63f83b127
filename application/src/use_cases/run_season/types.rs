//! Type definitions for the RunSeason use case.

use super::handle::SeasonCommand;
use house_domain::{CompetitorId, DomainError, PhaseTicket};
use thiserror::Error;

/// Errors that stop a season from running
#[derive(Error, Debug)]
pub enum RunSeasonError {
    #[error("roster needs at least {min} competitors, got {actual}")]
    RosterTooSmall { min: usize, actual: usize },

    #[error("invalid roster: {0}")]
    InvalidRoster(#[from] DomainError),

    #[error("Season cancelled")]
    Cancelled,
}

impl RunSeasonError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunSeasonError::Cancelled)
    }
}

/// Work scheduled for later in the current phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Deferred {
    pub ticket: PhaseTicket,
    pub event: DeferredEvent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum DeferredEvent {
    /// An AI competitor finishes playing
    Score { competitor: CompetitorId, seed: u64 },
}

/// What woke the scheduler up
#[derive(Debug)]
pub(super) enum Step {
    Command(SeasonCommand),
    Deferred(Deferred),
    Deadline,
}
