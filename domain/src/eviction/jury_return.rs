//! Jury return twist: the house votes one juror back in

use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::relationship::RelationshipGraph;
use crate::season::state::GameState;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::info;

/// Whether the twist fires after an eviction leaving `living` competitors
pub fn should_trigger(state: &GameState, enabled: bool, return_at: usize, living: usize) -> bool {
    enabled && !state.jury_return_used && living == return_at && !state.jury.is_empty()
}

/// Juror `voter` wants back: highest affinity, then lowest id
pub fn ai_return_vote(
    voter: CompetitorId,
    jury: &[CompetitorId],
    graph: &RelationshipGraph,
) -> Option<CompetitorId> {
    jury.iter().copied().max_by(|a, b| {
        graph
            .affinity(voter, *a)
            .total_cmp(&graph.affinity(voter, *b))
            .then_with(|| b.cmp(a))
    })
}

/// Juror with the most votes; ties and an empty count go to the rng
pub fn returning_juror<R: Rng + ?Sized>(
    votes: &[(CompetitorId, CompetitorId)],
    jury: &[CompetitorId],
    rng: &mut R,
) -> Option<CompetitorId> {
    let mut counts: BTreeMap<CompetitorId, u32> = BTreeMap::new();
    for (_, juror) in votes {
        if jury.contains(juror) {
            *counts.entry(*juror).or_insert(0) += 1;
        }
    }
    let max = counts.values().copied().max();
    let leaders: Vec<CompetitorId> = match max {
        Some(max) => counts
            .iter()
            .filter(|(_, c)| **c == max)
            .map(|(id, _)| *id)
            .collect(),
        None => jury.to_vec(),
    };
    leaders.choose(rng).copied()
}

/// Bring `juror` back into the game.
pub fn reinstate(juror: CompetitorId, state: &mut GameState, roster: &mut Roster) {
    state.jury.retain(|id| *id != juror);
    state.jury_return_used = true;
    if let Some(c) = roster.get_mut(juror) {
        c.evicted = false;
        c.nominated = false;
    }
    info!("{} returns to the house", roster.name_of(juror));
}
