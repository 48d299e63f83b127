//! Phase commit guard
//!
//! Each phase instance resolves exactly once. The record moves
//! `Pending → Resolving → Committed`; any resolution attempt that finds the
//! record elsewhere, or that carries another instance's ticket, is rejected.

use crate::season::phase::PhaseTicket;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitState {
    /// Waiting for input; nothing resolved yet
    Pending,
    /// Resolution started; side effects are being applied
    Resolving,
    /// Resolution finished
    Committed,
}

impl CommitState {
    pub fn is_pending(&self) -> bool {
        matches!(self, CommitState::Pending)
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, CommitState::Committed)
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitState::Pending => write!(f, "Pending"),
            CommitState::Resolving => write!(f, "Resolving"),
            CommitState::Committed => write!(f, "Committed"),
        }
    }
}

/// Why a resolution attempt was ignored
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitRejection {
    #[error("ticket {0} is not the current phase instance")]
    Stale(PhaseTicket),

    #[error("phase {0} is already resolving")]
    InProgress(PhaseTicket),

    #[error("phase {0} is already committed")]
    AlreadyCommitted(PhaseTicket),
}

/// Commit record of the current phase instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCommit {
    pub ticket: PhaseTicket,
    pub state: CommitState,
}

impl PhaseCommit {
    pub fn pending(ticket: PhaseTicket) -> Self {
        Self {
            ticket,
            state: CommitState::Pending,
        }
    }

    pub fn begin(&mut self, ticket: PhaseTicket) -> Result<(), CommitRejection> {
        if ticket != self.ticket {
            return Err(CommitRejection::Stale(ticket));
        }
        match self.state {
            CommitState::Pending => {
                self.state = CommitState::Resolving;
                Ok(())
            }
            CommitState::Resolving => Err(CommitRejection::InProgress(ticket)),
            CommitState::Committed => Err(CommitRejection::AlreadyCommitted(ticket)),
        }
    }

    pub fn finish(&mut self, ticket: PhaseTicket) -> Result<(), CommitRejection> {
        if ticket != self.ticket {
            return Err(CommitRejection::Stale(ticket));
        }
        match self.state {
            CommitState::Committed => Err(CommitRejection::AlreadyCommitted(ticket)),
            _ => {
                self.state = CommitState::Committed;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::phase::Phase;

    fn ticket(instance: u64) -> PhaseTicket {
        PhaseTicket {
            phase: Phase::Nomination,
            instance,
        }
    }

    #[test]
    fn test_begin_then_finish() {
        let mut commit = PhaseCommit::pending(ticket(1));
        assert!(commit.begin(ticket(1)).is_ok());
        assert_eq!(commit.state, CommitState::Resolving);
        assert!(commit.finish(ticket(1)).is_ok());
        assert!(commit.state.is_committed());
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut commit = PhaseCommit::pending(ticket(1));
        commit.begin(ticket(1)).unwrap();
        assert_eq!(commit.begin(ticket(1)), Err(CommitRejection::InProgress(ticket(1))));

        commit.finish(ticket(1)).unwrap();
        assert_eq!(
            commit.begin(ticket(1)),
            Err(CommitRejection::AlreadyCommitted(ticket(1)))
        );
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut commit = PhaseCommit::pending(ticket(2));
        assert_eq!(commit.begin(ticket(1)), Err(CommitRejection::Stale(ticket(1))));
        assert!(commit.state.is_pending());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            CommitRejection::AlreadyCommitted(ticket(3)).to_string(),
            "phase nomination#3 is already committed"
        );
    }
}
