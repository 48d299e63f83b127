//! Eviction vote and jury seating

use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::relationship::RelationshipGraph;
use crate::season::state::GameState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// How strongly an alliance shields a nominee from a member's vote
pub const ALLY_LOYALTY: f64 = 0.6;
/// Evictees join the jury once no more than `jury_size + JURY_SEAT_MARGIN` remain
pub const JURY_SEAT_MARGIN: usize = 2;
pub const DEFAULT_JURY_SIZE: usize = 7;

/// Living competitors who are neither nominated nor the power-holder
pub fn eviction_voters(state: &GameState, roster: &Roster) -> Vec<CompetitorId> {
    roster
        .living_ids()
        .into_iter()
        .filter(|id| !state.is_nominee(*id) && Some(*id) != state.power_holder)
        .collect()
}

/// Nominee `voter` wants gone: least liked, then most threatening, then lowest id.
pub fn ai_eviction_vote(
    voter: CompetitorId,
    nominees: &[CompetitorId],
    roster: &Roster,
    graph: &RelationshipGraph,
) -> Option<CompetitorId> {
    let keep_score = |id: CompetitorId| {
        let ally = if graph.share_alliance(voter, id) {
            ALLY_LOYALTY
        } else {
            0.0
        };
        graph.affinity(voter, id) + ally
    };
    nominees
        .iter()
        .copied()
        .filter(|id| *id != voter)
        .min_by(|a, b| {
            keep_score(*a)
                .total_cmp(&keep_score(*b))
                .then_with(|| roster.threat_of(*b).total_cmp(&roster.threat_of(*a)))
                .then_with(|| a.cmp(b))
        })
}

/// Finalist the final power-holder cuts: lower affinity, then higher threat.
pub fn ai_final_decision(
    holder: CompetitorId,
    candidates: &[CompetitorId],
    roster: &Roster,
    graph: &RelationshipGraph,
) -> Option<CompetitorId> {
    candidates
        .iter()
        .copied()
        .filter(|id| *id != holder)
        .min_by(|a, b| {
            graph
                .affinity(holder, *a)
                .total_cmp(&graph.affinity(holder, *b))
                .then_with(|| roster.threat_of(*b).total_cmp(&roster.threat_of(*a)))
                .then_with(|| a.cmp(b))
        })
}

/// Votes to evict, in casting order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvictionTally {
    votes: Vec<(CompetitorId, CompetitorId)>,
}

/// What the count says
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionCount {
    Evict(CompetitorId),
    /// Tied nominees, for the power-holder to decide between
    Tie(Vec<CompetitorId>),
    NoVotes,
}

impl EvictionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote; a voter's second vote is ignored.
    pub fn cast(&mut self, voter: CompetitorId, target: CompetitorId) -> bool {
        if self.has_voted(voter) {
            return false;
        }
        self.votes.push((voter, target));
        true
    }

    pub fn has_voted(&self, voter: CompetitorId) -> bool {
        self.votes.iter().any(|(v, _)| *v == voter)
    }

    pub fn votes(&self) -> &[(CompetitorId, CompetitorId)] {
        &self.votes
    }

    pub fn counts(&self, nominees: &[CompetitorId]) -> BTreeMap<CompetitorId, u32> {
        let mut counts: BTreeMap<CompetitorId, u32> = nominees.iter().map(|n| (*n, 0)).collect();
        for (_, target) in &self.votes {
            *counts.entry(*target).or_insert(0) += 1;
        }
        counts
    }

    pub fn count(&self, nominees: &[CompetitorId]) -> EvictionCount {
        if self.votes.is_empty() {
            return EvictionCount::NoVotes;
        }
        let counts = self.counts(nominees);
        let max = counts.values().copied().max().unwrap_or(0);
        let leaders: Vec<CompetitorId> = counts
            .iter()
            .filter(|(_, c)| **c == max)
            .map(|(id, _)| *id)
            .collect();
        match leaders.as_slice() {
            [single] => EvictionCount::Evict(*single),
            _ => EvictionCount::Tie(leaders),
        }
    }

    /// Voters grouped by the nominee they voted against
    pub fn blocs(&self) -> Vec<Vec<CompetitorId>> {
        let mut blocs: BTreeMap<CompetitorId, Vec<CompetitorId>> = BTreeMap::new();
        for (voter, target) in &self.votes {
            blocs.entry(*target).or_default().push(*voter);
        }
        blocs.into_values().collect()
    }
}

/// Where an evictee ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Jury,
    JuryHouse,
}

/// Evict `evictee` and seat them on the jury or in the jury house.
///
/// `living_before` is the living count before this eviction.
pub fn seat_evictee(
    evictee: CompetitorId,
    living_before: usize,
    jury_size: usize,
    state: &mut GameState,
    roster: &mut Roster,
) -> Seat {
    if let Some(c) = roster.get_mut(evictee) {
        c.evicted = true;
        c.nominated = false;
        c.power_holder = false;
    }
    state.nominees.retain(|id| *id != evictee);
    if state.power_holder == Some(evictee) {
        state.power_holder = None;
    }

    let seat = if living_before <= jury_size + JURY_SEAT_MARGIN {
        state.jury.push(evictee);
        Seat::Jury
    } else {
        state.jury_house.push(evictee);
        Seat::JuryHouse
    };
    info!("{} evicted ({:?})", roster.name_of(evictee), seat);
    seat
}
