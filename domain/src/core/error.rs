//! Domain error types

use crate::core::competitor::CompetitorId;
use thiserror::Error;

/// Domain-level errors
///
/// Only roster construction can fail. Everything that happens once a season
/// is running recovers locally instead of surfacing an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Roster needs at least {min} competitors, got {actual}")]
    RosterTooSmall { min: usize, actual: usize },

    #[error("Roster allows at most {max} competitors, got {actual}")]
    RosterTooLarge { max: usize, actual: usize },

    #[error("Duplicate competitor name: {0}")]
    DuplicateName(String),

    #[error("Unknown competitor: {0}")]
    UnknownCompetitor(CompetitorId),
}

impl DomainError {
    /// Check if this error is about the size of the roster
    pub fn is_roster_size(&self) -> bool {
        matches!(
            self,
            DomainError::RosterTooSmall { .. } | DomainError::RosterTooLarge { .. }
        )
    }
}
