//! AI ballots, tie-break weighting and the final verdict

use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::jury::ballot::Ballot;
use crate::jury::tally::JuryTally;
use crate::relationship::RelationshipGraph;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Affinity gap under which a juror treats the finalists as equal
pub const AFFINITY_EPSILON: f64 = 0.05;

pub const MIN_TIE_BREAK_BIAS: f64 = 0.25;
pub const MAX_TIE_BREAK_BIAS: f64 = 0.75;

/// Jury in voting order
pub fn shuffled_jurors<R: Rng + ?Sized>(jury: &[CompetitorId], rng: &mut R) -> Vec<CompetitorId> {
    let mut jurors = jury.to_vec();
    jurors.shuffle(rng);
    jurors
}

/// Which finalist an AI juror votes for.
///
/// The juror follows affinity. When the two are within [`AFFINITY_EPSILON`]
/// the less threatening finalist gets the vote, then the lower id.
pub fn ai_ballot(
    juror: CompetitorId,
    a: CompetitorId,
    b: CompetitorId,
    roster: &Roster,
    graph: &RelationshipGraph,
) -> CompetitorId {
    let toward_a = graph.affinity(juror, a);
    let toward_b = graph.affinity(juror, b);
    if (toward_a - toward_b).abs() > AFFINITY_EPSILON {
        return if toward_a > toward_b { a } else { b };
    }

    let threat_a = roster.threat_of(a);
    let threat_b = roster.threat_of(b);
    if threat_a < threat_b {
        a
    } else if threat_b < threat_a {
        b
    } else {
        a.min(b)
    }
}

/// Probability that a tie goes to `a`.
///
/// Leans toward the weaker finalist, bounded to [0.25, 0.75]. The curve is a
/// placeholder heuristic.
pub fn tie_break_bias(a: CompetitorId, b: CompetitorId, roster: &Roster) -> f64 {
    let diff = roster.threat_of(b) - roster.threat_of(a);
    (0.5 + 0.5 * diff).clamp(MIN_TIE_BREAK_BIAS, MAX_TIE_BREAK_BIAS)
}

/// Weighted coin between the finalists
pub fn weighted_draw<R: Rng + ?Sized>(
    a: CompetitorId,
    b: CompetitorId,
    bias_toward_a: f64,
    rng: &mut R,
) -> CompetitorId {
    if rng.gen_bool(bias_toward_a.clamp(0.0, 1.0)) { a } else { b }
}

/// Declared result of the jury vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryVerdict {
    pub winner: CompetitorId,
    pub runner_up: Option<CompetitorId>,
    /// Displayed counts; a tie-break adds one to the winner
    pub votes: BTreeMap<CompetitorId, u32>,
    pub ballots: Vec<Ballot>,
    pub tie_break_used: bool,
    pub clinched_by: Option<CompetitorId>,
}

impl JuryVerdict {
    pub fn from_tally(
        tally: &JuryTally,
        ballots: Vec<Ballot>,
        winner: CompetitorId,
        runner_up: Option<CompetitorId>,
        tie_break_used: bool,
    ) -> Self {
        let mut votes = tally.counts().clone();
        if tie_break_used {
            *votes.entry(winner).or_insert(0) += 1;
        }
        Self {
            winner,
            runner_up,
            votes,
            ballots,
            tie_break_used,
            clinched_by: tally.clinched(),
        }
    }

    pub fn score_line(&self, roster: &Roster) -> String {
        let winner_votes = self.votes.get(&self.winner).copied().unwrap_or(0);
        match self.runner_up {
            Some(r) => format!(
                "{} defeats {} {}-{}",
                roster.name_of(self.winner),
                roster.name_of(r),
                winner_votes,
                self.votes.get(&r).copied().unwrap_or(0)
            ),
            None => format!("{} wins", roster.name_of(self.winner)),
        }
    }
}
