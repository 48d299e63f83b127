//! Incremental jury tally

use crate::core::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Votes needed to clinch with `jurors` jurors (more than half)
pub fn majority_threshold(jurors: usize) -> usize {
    jurors / 2 + 1
}

/// Result of a completed count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyOutcome {
    Decided {
        winner: CompetitorId,
        runner_up: CompetitorId,
    },
    Tied,
}

/// Running count of jury votes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JuryTally {
    finalists: Vec<CompetitorId>,
    counts: BTreeMap<CompetitorId, u32>,
    order: Vec<CompetitorId>,
    juror_count: usize,
    clinched: Option<CompetitorId>,
}

impl JuryTally {
    pub fn new(finalists: Vec<CompetitorId>, juror_count: usize) -> Self {
        let counts = finalists.iter().map(|f| (*f, 0)).collect();
        Self {
            finalists,
            counts,
            order: Vec::new(),
            juror_count,
            clinched: None,
        }
    }

    /// Count one vote; returns the finalist the first time they clinch.
    pub fn record(&mut self, finalist: CompetitorId) -> Option<CompetitorId> {
        let count = self.counts.entry(finalist).or_insert(0);
        *count += 1;
        self.order.push(finalist);

        if self.clinched.is_none()
            && self.juror_count > 0
            && *count as usize >= majority_threshold(self.juror_count)
        {
            self.clinched = Some(finalist);
            return Some(finalist);
        }
        None
    }

    pub fn count(&self, finalist: CompetitorId) -> u32 {
        self.counts.get(&finalist).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<CompetitorId, u32> {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn clinched(&self) -> Option<CompetitorId> {
        self.clinched
    }

    /// Compare the two finalists' counts
    pub fn outcome(&self) -> TallyOutcome {
        let (a, b) = match self.finalists.as_slice() {
            [a, b, ..] => (*a, *b),
            [a] => {
                return TallyOutcome::Decided {
                    winner: *a,
                    runner_up: *a,
                };
            }
            [] => return TallyOutcome::Tied,
        };
        match self.count(a).cmp(&self.count(b)) {
            std::cmp::Ordering::Greater => TallyOutcome::Decided {
                winner: a,
                runner_up: b,
            },
            std::cmp::Ordering::Less => TallyOutcome::Decided {
                winner: b,
                runner_up: a,
            },
            std::cmp::Ordering::Equal => TallyOutcome::Tied,
        }
    }

    /// Vote sequence, e.g. "[AABAB]" with A the first finalist
    pub fn summary(&self) -> String {
        let mut summary = String::from("[");
        for vote in &self.order {
            let mark = match self.finalists.iter().position(|f| f == vote) {
                Some(0) => 'A',
                Some(1) => 'B',
                _ => '?',
            };
            summary.push(mark);
        }
        summary.push(']');
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: CompetitorId = CompetitorId(1);
    const B: CompetitorId = CompetitorId(2);

    #[test]
    fn test_majority_threshold() {
        assert_eq!(majority_threshold(5), 3);
        assert_eq!(majority_threshold(4), 3);
        assert_eq!(majority_threshold(7), 4);
        assert_eq!(majority_threshold(1), 1);
    }

    #[test]
    fn test_clinch_fires_once_when_a_reaches_three() {
        let mut tally = JuryTally::new(vec![A, B], 5);
        let events: Vec<Option<CompetitorId>> =
            [A, A, B, A, B].into_iter().map(|f| tally.record(f)).collect();

        assert_eq!(events, vec![None, None, None, Some(A), None]);
        assert_eq!(tally.clinched(), Some(A));
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.outcome(), TallyOutcome::Decided { winner: A, runner_up: B });
        assert_eq!(tally.summary(), "[AABAB]");
    }

    #[test]
    fn test_even_split_is_tied_without_clinch() {
        let mut tally = JuryTally::new(vec![A, B], 4);
        for f in [A, B, B, A] {
            assert!(tally.record(f).is_none());
        }
        assert_eq!(tally.outcome(), TallyOutcome::Tied);
        assert!(tally.clinched().is_none());
    }

    #[test]
    fn test_second_finalist_can_win() {
        let mut tally = JuryTally::new(vec![A, B], 3);
        tally.record(B);
        tally.record(A);
        assert_eq!(tally.record(B), Some(B));
        assert_eq!(tally.outcome(), TallyOutcome::Decided { winner: B, runner_up: A });
    }

    #[test]
    fn test_empty_tally_is_tied() {
        let tally = JuryTally::new(vec![A, B], 0);
        assert_eq!(tally.outcome(), TallyOutcome::Tied);
        assert_eq!(tally.count(A), 0);
    }
}
