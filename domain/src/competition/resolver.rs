//! Score collection and winner determination

use crate::competition::kind::CompetitionKind;
use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::season::state::GameState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Range of the score given to an entrant who never submitted
pub const DEFAULT_SCORE_MIN: f64 = 5.0;
pub const DEFAULT_SCORE_MAX: f64 = 10.0;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRejection {
    #[error("{0} is not playing this competition")]
    NotEligible(CompetitorId),

    #[error("{0} already has a score")]
    AlreadySubmitted(CompetitorId),

    #[error("{0} sent a score that is not a finite number")]
    NotFinite(CompetitorId),
}

/// Result of a resolved competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionOutcome {
    pub kind: CompetitionKind,
    pub winner: CompetitorId,
    /// Scores, best first
    pub standings: Vec<(CompetitorId, f64)>,
    /// Entrants who received a default score
    pub defaulted: Vec<CompetitorId>,
}

impl CompetitionOutcome {
    pub fn losers(&self) -> impl Iterator<Item = CompetitorId> + '_ {
        self.standings
            .iter()
            .map(|(id, _)| *id)
            .filter(move |id| *id != self.winner)
    }
}

/// Collects scores for one competition instance
///
/// Scores live in [`GameState::scores`]; the resolver only carries the kind
/// and the eligible entrants, in the order used for tie resolution.
#[derive(Debug, Clone)]
pub struct CompetitionResolver {
    kind: CompetitionKind,
    eligible: Vec<CompetitorId>,
}

impl CompetitionResolver {
    pub fn new(kind: CompetitionKind, eligible: Vec<CompetitorId>) -> Self {
        Self { kind, eligible }
    }

    pub fn kind(&self) -> CompetitionKind {
        self.kind
    }

    pub fn eligible(&self) -> &[CompetitorId] {
        &self.eligible
    }

    pub fn is_eligible(&self, id: CompetitorId) -> bool {
        self.eligible.contains(&id)
    }

    pub fn begin(&self, state: &mut GameState) {
        state.scores.clear();
    }

    /// Store `raw × (0.8 + 0.4·comp_rating)` for `id`; returns the stored score.
    pub fn submit(
        &self,
        state: &mut GameState,
        id: CompetitorId,
        raw: f64,
        comp_rating: f64,
    ) -> Result<f64, ScoreRejection> {
        if !self.is_eligible(id) {
            return Err(ScoreRejection::NotEligible(id));
        }
        if state.scores.contains_key(&id) {
            return Err(ScoreRejection::AlreadySubmitted(id));
        }
        if !raw.is_finite() {
            return Err(ScoreRejection::NotFinite(id));
        }
        let score = raw * (0.8 + 0.4 * comp_rating);
        state.scores.insert(id, score);
        debug!("{} scored {:.2} in {} competition", id, score, self.kind);
        Ok(score)
    }

    pub fn is_complete(&self, state: &GameState) -> bool {
        self.eligible.iter().all(|id| state.scores.contains_key(id))
    }

    pub fn missing(&self, state: &GameState) -> Vec<CompetitorId> {
        self.eligible
            .iter()
            .copied()
            .filter(|id| !state.scores.contains_key(id))
            .collect()
    }

    /// Fill in defaults for missing entrants and pick the winner.
    ///
    /// Returns `None` only when nobody is eligible.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
    ) -> Option<CompetitionOutcome> {
        let defaulted = self.missing(state);
        for id in &defaulted {
            let score = rng.gen_range(DEFAULT_SCORE_MIN..DEFAULT_SCORE_MAX);
            state.scores.insert(*id, score);
            debug!("{} defaulted to {:.2}", id, score);
        }

        let mut winner: Option<(CompetitorId, f64)> = None;
        for id in &self.eligible {
            let score = state.scores.get(id).copied().unwrap_or(0.0);
            match winner {
                Some((_, best)) if score <= best => {}
                _ => winner = Some((*id, score)),
            }
        }
        let (winner, _) = winner?;

        let mut standings: Vec<(CompetitorId, f64)> = self
            .eligible
            .iter()
            .map(|id| (*id, state.scores.get(id).copied().unwrap_or(0.0)))
            .collect();
        standings.sort_by(|a, b| b.1.total_cmp(&a.1));

        Some(CompetitionOutcome {
            kind: self.kind,
            winner,
            standings,
            defaulted,
        })
    }
}

/// Apply the side effects of a win to state and roster.
pub fn apply_win(outcome: &CompetitionOutcome, state: &mut GameState, roster: &mut Roster) {
    let winner = outcome.winner;
    match outcome.kind {
        CompetitionKind::Power => {
            state.last_power_holder = state.power_holder;
            state.power_holder = Some(winner);
            roster.crown_power_holder(winner);
        }
        CompetitionKind::Veto => {
            state.veto_holder = Some(winner);
            if let Some(c) = roster.get_mut(winner) {
                c.record_veto_win();
            }
        }
        CompetitionKind::FinalPart1 | CompetitionKind::FinalPart2 | CompetitionKind::FinalPart3 => {
            if let Some(c) = roster.get_mut(winner) {
                c.record_final_win();
            }
            match outcome.kind {
                CompetitionKind::FinalPart1 => state.final_part1_winner = Some(winner),
                CompetitionKind::FinalPart2 => state.final_part2_winner = Some(winner),
                _ => {
                    state.last_power_holder = state.power_holder;
                    state.power_holder = Some(winner);
                    roster.hand_power_to(winner);
                }
            }
        }
    }
    info!(
        "{} won the {} competition (threat {:.2})",
        roster.name_of(winner),
        outcome.kind,
        roster.threat_of(winner)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::eligibility::power_competition_eligible;
    use crate::core::roster::RosterBuilder;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ids(raw: &[u32]) -> Vec<CompetitorId> {
        raw.iter().map(|n| CompetitorId(*n)).collect()
    }

    #[test]
    fn test_submit_applies_multiplier() {
        let resolver = CompetitionResolver::new(CompetitionKind::Power, ids(&[1, 2]));
        let mut state = GameState::new();
        let score = resolver.submit(&mut state, CompetitorId(1), 50.0, 0.5).unwrap();
        assert!((score - 50.0).abs() < 1e-9);
        let score = resolver.submit(&mut state, CompetitorId(2), 50.0, 1.0).unwrap();
        assert!((score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_submit_rejects_ineligible_and_duplicates() {
        let resolver = CompetitionResolver::new(CompetitionKind::Veto, ids(&[1, 2]));
        let mut state = GameState::new();
        assert_eq!(
            resolver.submit(&mut state, CompetitorId(3), 10.0, 0.5),
            Err(ScoreRejection::NotEligible(CompetitorId(3)))
        );
        resolver.submit(&mut state, CompetitorId(1), 10.0, 0.5).unwrap();
        assert_eq!(
            resolver.submit(&mut state, CompetitorId(1), 99.0, 0.5),
            Err(ScoreRejection::AlreadySubmitted(CompetitorId(1)))
        );
        assert!((state.scores[&CompetitorId(1)] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_score_is_refused_and_best_still_wins() {
        let resolver = CompetitionResolver::new(CompetitionKind::Power, ids(&[1, 2, 3]));
        let mut state = GameState::new();
        resolver.submit(&mut state, CompetitorId(1), 90.0, 0.5).unwrap();
        for raw in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                resolver.submit(&mut state, CompetitorId(2), raw, 0.5),
                Err(ScoreRejection::NotFinite(CompetitorId(2)))
            );
        }
        assert!(!state.scores.contains_key(&CompetitorId(2)));
        resolver.submit(&mut state, CompetitorId(3), 10.0, 0.5).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = resolver.resolve(&mut state, &mut rng).unwrap();
        assert_eq!(outcome.winner, CompetitorId(1));
        assert_eq!(outcome.defaulted, vec![CompetitorId(2)]);
    }

    #[test]
    fn test_complete_when_everyone_submitted() {
        let resolver = CompetitionResolver::new(CompetitionKind::Power, ids(&[1, 2]));
        let mut state = GameState::new();
        resolver.submit(&mut state, CompetitorId(1), 10.0, 0.5).unwrap();
        assert!(!resolver.is_complete(&state));
        resolver.submit(&mut state, CompetitorId(2), 10.0, 0.5).unwrap();
        assert!(resolver.is_complete(&state));
    }

    #[test]
    fn test_begin_clears_previous_scores() {
        let resolver = CompetitionResolver::new(CompetitionKind::Power, ids(&[1]));
        let mut state = GameState::new();
        state.scores.insert(CompetitorId(9), 1.0);
        resolver.begin(&mut state);
        assert!(state.scores.is_empty());
    }

    #[test]
    fn test_missing_score_gets_default_and_winner_exists() {
        // five left, week 3, outgoing holder sits out
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut roster = RosterBuilder::new(["A", "B", "C", "D", "E", "F"])
            .build(&mut rng)
            .unwrap();
        roster.get_mut(CompetitorId(5)).unwrap().evicted = true;
        let mut state = GameState::new();
        state.week = 3;
        state.power_holder = Some(CompetitorId(4));

        let eligible = power_competition_eligible(&state, &roster);
        assert_eq!(eligible, ids(&[1, 2, 3, 6]));

        let resolver = CompetitionResolver::new(CompetitionKind::Power, eligible);
        resolver.begin(&mut state);
        resolver.submit(&mut state, CompetitorId(1), 1.0, 0.5).unwrap();
        resolver.submit(&mut state, CompetitorId(2), 2.0, 0.5).unwrap();
        resolver.submit(&mut state, CompetitorId(6), 3.0, 0.5).unwrap();

        let outcome = resolver.resolve(&mut state, &mut rng).unwrap();
        assert_eq!(outcome.defaulted, vec![CompetitorId(3)]);
        let default = state.scores[&CompetitorId(3)];
        assert!((DEFAULT_SCORE_MIN..DEFAULT_SCORE_MAX).contains(&default));
        assert_eq!(outcome.winner, CompetitorId(3));
        assert_eq!(outcome.standings.len(), 4);
    }

    #[test]
    fn test_exact_tie_first_max_wins() {
        let resolver = CompetitionResolver::new(CompetitionKind::Power, ids(&[3, 1, 2]));
        let mut state = GameState::new();
        resolver.submit(&mut state, CompetitorId(3), 40.0, 0.5).unwrap();
        resolver.submit(&mut state, CompetitorId(1), 40.0, 0.5).unwrap();
        resolver.submit(&mut state, CompetitorId(2), 10.0, 0.5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = resolver.resolve(&mut state, &mut rng).unwrap();
        assert_eq!(outcome.winner, CompetitorId(3));
        assert!(outcome.defaulted.is_empty());
    }

    #[test]
    fn test_resolve_with_nobody_eligible() {
        let resolver = CompetitionResolver::new(CompetitionKind::Veto, Vec::new());
        let mut state = GameState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(resolver.resolve(&mut state, &mut rng).is_none());
    }

    #[test]
    fn test_power_win_moves_flags_and_threat() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut roster = RosterBuilder::new(["A", "B", "C", "D", "E"])
            .build(&mut rng)
            .unwrap();
        let mut state = GameState::new();
        roster.crown_power_holder(CompetitorId(1));
        state.power_holder = Some(CompetitorId(1));
        let before = roster.threat_of(CompetitorId(2));

        let outcome = CompetitionOutcome {
            kind: CompetitionKind::Power,
            winner: CompetitorId(2),
            standings: vec![(CompetitorId(2), 50.0)],
            defaulted: Vec::new(),
        };
        apply_win(&outcome, &mut state, &mut roster);

        assert_eq!(state.power_holder, Some(CompetitorId(2)));
        assert_eq!(state.last_power_holder, Some(CompetitorId(1)));
        assert_eq!(roster.power_holders(), vec![CompetitorId(2)]);
        assert_eq!(roster.get(CompetitorId(2)).unwrap().power_wins, 1);
        assert!(roster.threat_of(CompetitorId(2)) > before);
    }

    #[test]
    fn test_final_part_three_hands_power_without_power_win() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut roster = RosterBuilder::new(["A", "B", "C"]).build(&mut rng).unwrap();
        let mut state = GameState::new();
        let outcome = CompetitionOutcome {
            kind: CompetitionKind::FinalPart3,
            winner: CompetitorId(3),
            standings: vec![(CompetitorId(3), 70.0), (CompetitorId(1), 20.0)],
            defaulted: Vec::new(),
        };
        apply_win(&outcome, &mut state, &mut roster);

        let winner = roster.get(CompetitorId(3)).unwrap();
        assert!(winner.power_holder);
        assert_eq!(winner.final_wins, 1);
        assert_eq!(winner.power_wins, 0);
        assert_eq!(outcome.losers().collect::<Vec<_>>(), vec![CompetitorId(1)]);
    }
}
