//! Nominee selection, validation and finalization

use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::relationship::RelationshipGraph;
use crate::season::state::GameState;
use crate::season::twist::TwistConfig;
use std::cmp::Ordering;
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

/// Score adjustment for a candidate allied with the power-holder
pub const ALLY_PROTECTION: f64 = -0.6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NominationError {
    #[error("expected {expected} nominees, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("{0} was nominated more than once")]
    Duplicate(CompetitorId),

    #[error("the power-holder {0} cannot be nominated")]
    PowerHolder(CompetitorId),

    #[error("{0} is not eligible for nomination")]
    NotEligible(CompetitorId),
}

/// Number of nominee slots, capped at the pool size.
pub fn slots(twists: &TwistConfig, pool_size: usize) -> usize {
    twists.nominee_slots().min(pool_size)
}

/// Living competitors except the power-holder
pub fn eligible_pool(state: &GameState, roster: &Roster) -> Vec<CompetitorId> {
    roster
        .living_ids()
        .into_iter()
        .filter(|id| Some(*id) != state.power_holder)
        .collect()
}

/// How much `holder` wants `candidate` on the block
pub fn nomination_score(
    holder: CompetitorId,
    candidate: CompetitorId,
    roster: &Roster,
    graph: &RelationshipGraph,
) -> f64 {
    let bonus = if graph.share_alliance(holder, candidate) {
        ALLY_PROTECTION
    } else {
        0.0
    };
    roster.threat_of(candidate) - graph.affinity(holder, candidate) + bonus
}

/// Candidates ranked by descending score, ties by ascending id
pub fn rank_candidates(
    holder: CompetitorId,
    pool: &[CompetitorId],
    roster: &Roster,
    graph: &RelationshipGraph,
) -> Vec<(CompetitorId, f64)> {
    let mut ranked: Vec<(CompetitorId, f64)> = pool
        .iter()
        .filter(|id| **id != holder)
        .map(|id| (*id, nomination_score(holder, *id, roster, graph)))
        .collect();
    ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    ranked.dedup_by_key(|(id, _)| *id);
    ranked
}

/// AI pick of the top `slots` candidates.
pub fn ai_select(
    holder: CompetitorId,
    pool: &[CompetitorId],
    slots: usize,
    roster: &Roster,
    graph: &RelationshipGraph,
) -> Vec<CompetitorId> {
    rank_candidates(holder, pool, roster, graph)
        .into_iter()
        .take(slots)
        .map(|(id, _)| id)
        .collect()
}

/// Check a human submission without touching state.
pub fn validate(
    picks: &[CompetitorId],
    slots: usize,
    pool: &[CompetitorId],
    power_holder: Option<CompetitorId>,
) -> Result<(), NominationError> {
    if picks.len() != slots {
        return Err(NominationError::WrongCount {
            expected: slots,
            actual: picks.len(),
        });
    }
    let mut seen = HashSet::new();
    for id in picks {
        if Some(*id) == power_holder {
            return Err(NominationError::PowerHolder(*id));
        }
        if !seen.insert(*id) {
            return Err(NominationError::Duplicate(*id));
        }
        if !pool.contains(id) {
            return Err(NominationError::NotEligible(*id));
        }
    }
    Ok(())
}

/// Put `nominees` on the block.
///
/// Callers go through the phase commit guard; this function itself applies
/// its side effects unconditionally.
pub fn finalize(
    nominees: &[CompetitorId],
    state: &mut GameState,
    roster: &mut Roster,
    graph: &mut RelationshipGraph,
) {
    state.nominees = nominees.to_vec();
    for id in nominees {
        if let Some(c) = roster.get_mut(*id) {
            c.nominated = true;
            c.times_nominated += 1;
        }
        if let Some(holder) = state.power_holder {
            graph.apply_nomination_penalty(holder, *id);
        }
    }
    let names: Vec<String> = nominees.iter().map(|id| roster.name_of(*id)).collect();
    info!("Nominated: {}", names.join(", "));
}

/// Pool for the replacement nominee after a used veto
pub fn replacement_pool(
    state: &GameState,
    roster: &Roster,
    saved: CompetitorId,
) -> Vec<CompetitorId> {
    eligible_pool(state, roster)
        .into_iter()
        .filter(|id| {
            *id != saved && !state.nominees.contains(id) && Some(*id) != state.veto_holder
        })
        .collect()
}

/// Best replacement by the same heuristic, if anyone is left
pub fn ai_replacement(
    holder: CompetitorId,
    pool: &[CompetitorId],
    roster: &Roster,
    graph: &RelationshipGraph,
) -> Option<CompetitorId> {
    ai_select(holder, pool, 1, roster, graph).into_iter().next()
}
