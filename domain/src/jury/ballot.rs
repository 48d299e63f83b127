//! Jury ballots
//!
//! A juror casts exactly one ballot for one of the finalists.

use crate::core::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One juror's vote for a finalist
///
/// # Example
///
/// ```
/// use house_domain::core::competitor::CompetitorId;
/// use house_domain::jury::{Ballot, BallotBox};
///
/// let mut ballots = BallotBox::new(
///     vec![CompetitorId(1), CompetitorId(2)],
///     vec![CompetitorId(7), CompetitorId(8)],
/// );
/// assert!(ballots.cast(Ballot::new(CompetitorId(7), CompetitorId(2))).is_ok());
/// assert!(ballots.cast(Ballot::new(CompetitorId(7), CompetitorId(1))).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub juror: CompetitorId,
    pub finalist: CompetitorId,
}

impl Ballot {
    pub fn new(juror: CompetitorId, finalist: CompetitorId) -> Self {
        Self { juror, finalist }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotError {
    #[error("{0} is not on the jury")]
    NotAJuror(CompetitorId),

    #[error("{0} is not a finalist")]
    NotAFinalist(CompetitorId),

    #[error("{0} has already voted")]
    AlreadyCast(CompetitorId),
}

/// Write-once ballot storage for one jury vote
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallotBox {
    finalists: Vec<CompetitorId>,
    jurors: Vec<CompetitorId>,
    ballots: Vec<Ballot>,
}

impl BallotBox {
    pub fn new(finalists: Vec<CompetitorId>, jurors: Vec<CompetitorId>) -> Self {
        Self {
            finalists,
            jurors,
            ballots: Vec::new(),
        }
    }

    pub fn cast(&mut self, ballot: Ballot) -> Result<(), BallotError> {
        if !self.jurors.contains(&ballot.juror) {
            return Err(BallotError::NotAJuror(ballot.juror));
        }
        if !self.finalists.contains(&ballot.finalist) {
            return Err(BallotError::NotAFinalist(ballot.finalist));
        }
        if self.has_voted(ballot.juror) {
            return Err(BallotError::AlreadyCast(ballot.juror));
        }
        self.ballots.push(ballot);
        Ok(())
    }

    pub fn has_voted(&self, juror: CompetitorId) -> bool {
        self.ballots.iter().any(|b| b.juror == juror)
    }

    pub fn finalists(&self) -> &[CompetitorId] {
        &self.finalists
    }

    pub fn jurors(&self) -> &[CompetitorId] {
        &self.jurors
    }

    /// Ballots in the order they were cast
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn pending_jurors(&self) -> impl Iterator<Item = CompetitorId> + '_ {
        self.jurors.iter().copied().filter(|j| !self.has_voted(*j))
    }

    pub fn is_complete(&self) -> bool {
        self.ballots.len() == self.jurors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot_box() -> BallotBox {
        BallotBox::new(
            vec![CompetitorId(1), CompetitorId(2)],
            vec![CompetitorId(5), CompetitorId(6), CompetitorId(7)],
        )
    }

    #[test]
    fn test_cast_is_write_once() {
        let mut ballots = ballot_box();
        ballots.cast(Ballot::new(CompetitorId(5), CompetitorId(1))).unwrap();
        assert_eq!(
            ballots.cast(Ballot::new(CompetitorId(5), CompetitorId(2))),
            Err(BallotError::AlreadyCast(CompetitorId(5)))
        );
        assert_eq!(ballots.ballots().len(), 1);
        assert_eq!(ballots.ballots()[0].finalist, CompetitorId(1));
    }

    #[test]
    fn test_cast_rejects_outsiders() {
        let mut ballots = ballot_box();
        assert_eq!(
            ballots.cast(Ballot::new(CompetitorId(1), CompetitorId(2))),
            Err(BallotError::NotAJuror(CompetitorId(1)))
        );
        assert_eq!(
            ballots.cast(Ballot::new(CompetitorId(5), CompetitorId(6))),
            Err(BallotError::NotAFinalist(CompetitorId(6)))
        );
    }

    #[test]
    fn test_pending_and_complete() {
        let mut ballots = ballot_box();
        ballots.cast(Ballot::new(CompetitorId(6), CompetitorId(2))).unwrap();
        let pending: Vec<_> = ballots.pending_jurors().collect();
        assert_eq!(pending, vec![CompetitorId(5), CompetitorId(7)]);
        assert!(!ballots.is_complete());

        ballots.cast(Ballot::new(CompetitorId(5), CompetitorId(2))).unwrap();
        ballots.cast(Ballot::new(CompetitorId(7), CompetitorId(1))).unwrap();
        assert!(ballots.is_complete());
    }
}
