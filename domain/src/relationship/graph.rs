//! The relationship graph: bonds, affinities and alliances

use crate::core::competitor::{CompetitorId, Personality};
use crate::relationship::alliance::{
    Alliance, AllianceId, MAX_ALLIANCE_SIZE, MIN_ALLIANCE_SIZE, PruneReason,
    qualifies_for_formation,
};
use crate::relationship::bond::BondMatrix;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Amount every bond moves toward zero per tick
pub const BOND_DECAY_STEP: f64 = 1.0;
/// Bond changes at least this large are logged
pub const BOND_LOG_THRESHOLD: f64 = 12.0;
pub const FORMATION_ATTEMPTS: usize = 4;
pub const FORMATION_CHANCE: f64 = 0.35;
/// Largest subset drawn when attempting to form an alliance
pub const MAX_FORMATION_SUBSET: usize = 5;

pub const NOMINATION_BOND_PENALTY: f64 = -15.0;
pub const VETO_SAVE_BOND_REWARD: f64 = 20.0;
pub const SHARED_VOTE_BOND_REWARD: f64 = 4.0;

/// Outcome of one social tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub formed: Vec<AllianceId>,
    pub pruned: Vec<(AllianceId, PruneReason)>,
}

/// Owns every social relation between competitors.
///
/// Bonds are symmetric and decay every tick. Affinities are directed and do
/// not decay; they move only through explicit events. Out-of-range values are
/// clamped, never rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    bonds: BondMatrix,
    affinity: BTreeMap<(CompetitorId, CompetitorId), f64>,
    alliances: Vec<Alliance>,
    next_alliance_id: u32,
    ticks: u64,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed near-zero bonds for every pair and small random affinities
    pub fn seeded<R: Rng + ?Sized>(ids: &[CompetitorId], rng: &mut R) -> Self {
        let mut graph = Self::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                graph.bonds.set(*a, *b, rng.gen_range(-5.0..=5.0));
            }
        }
        for a in ids {
            for b in ids {
                if a != b {
                    graph.set_affinity(*a, *b, rng.gen_range(-0.15..=0.15));
                }
            }
        }
        graph
    }

    // ==================== Bonds ====================

    pub fn bond(&self, a: CompetitorId, b: CompetitorId) -> f64 {
        self.bonds.get(a, b)
    }

    pub fn set_bond(&mut self, a: CompetitorId, b: CompetitorId, value: f64) {
        if let Some(previous) = self.bonds.set(a, b, value) {
            let delta = self.bonds.get(a, b) - previous;
            if delta.abs() >= BOND_LOG_THRESHOLD {
                debug!(%a, %b, delta, "bond shift");
            }
        }
    }

    pub fn add_bond(&mut self, a: CompetitorId, b: CompetitorId, delta: f64) {
        let current = self.bond(a, b);
        self.set_bond(a, b, current + delta);
    }

    pub fn bonds(&self) -> &BondMatrix {
        &self.bonds
    }

    // ==================== Affinity ====================

    pub fn affinity(&self, from: CompetitorId, to: CompetitorId) -> f64 {
        self.affinity.get(&(from, to)).copied().unwrap_or(0.0)
    }

    pub fn set_affinity(&mut self, from: CompetitorId, to: CompetitorId, value: f64) {
        if from == to {
            return;
        }
        self.affinity.insert((from, to), value.clamp(-1.0, 1.0));
    }

    pub fn nudge_affinity(&mut self, from: CompetitorId, to: CompetitorId, delta: f64) {
        let current = self.affinity(from, to);
        self.set_affinity(from, to, current + delta);
    }

    // ==================== Alliances ====================

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn alliances_of(&self, id: CompetitorId) -> impl Iterator<Item = &Alliance> {
        self.alliances.iter().filter(move |a| a.contains(id))
    }

    pub fn share_alliance(&self, a: CompetitorId, b: CompetitorId) -> bool {
        a != b && self.alliances.iter().any(|al| al.contains(a) && al.contains(b))
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One social step over the `active` competitors.
    ///
    /// Order matters: decay, cohesion, prune, then formation. Formation never
    /// sees an alliance that should already have been pruned.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, active: &[CompetitorId]) -> TickReport {
        self.ticks += 1;
        self.bonds.decay_all(BOND_DECAY_STEP);

        for alliance in &mut self.alliances {
            alliance.retain_members(|id| active.contains(&id));
            alliance.recompute_cohesion(&self.bonds);
        }

        let mut report = TickReport::default();
        let bonds = &self.bonds;
        self.alliances.retain(|alliance| match alliance.disqualification(bonds) {
            Some(reason) => {
                debug!(alliance = %alliance.id, ?reason, "alliance disbanded");
                report.pruned.push((alliance.id, reason));
                false
            }
            None => true,
        });

        if active.len() >= MIN_ALLIANCE_SIZE {
            for _ in 0..FORMATION_ATTEMPTS {
                if !rng.gen_bool(FORMATION_CHANCE) {
                    continue;
                }
                let upper = MAX_FORMATION_SUBSET.min(active.len());
                let size = rng.gen_range(MIN_ALLIANCE_SIZE..=upper);
                let candidate: Vec<CompetitorId> =
                    active.choose_multiple(rng, size).copied().collect();
                if let Some(id) = self.try_form(candidate) {
                    report.formed.push(id);
                }
            }
        }

        report
    }

    /// Form an alliance if `members` qualifies and is not a duplicate.
    pub fn try_form(&mut self, members: Vec<CompetitorId>) -> Option<AllianceId> {
        if members.len() > MAX_ALLIANCE_SIZE || !qualifies_for_formation(&members, &self.bonds) {
            return None;
        }
        if self.alliances.iter().any(|a| a.has_members(&members)) {
            return None;
        }

        self.next_alliance_id += 1;
        let id = AllianceId(self.next_alliance_id);
        let mut alliance = Alliance::new(id, members, self.ticks);
        alliance.recompute_cohesion(&self.bonds);
        debug!(alliance = %id, members = ?alliance.members(), cohesion = alliance.cohesion, "alliance formed");
        self.alliances.push(alliance);
        Some(id)
    }

    // ==================== Events ====================

    /// Ambient mingling between active competitors.
    ///
    /// About half as many random pairs as there are competitors interact; the
    /// bond delta is scaled by personality compatibility and spills over into
    /// both directed affinities.
    pub fn socialize<R: Rng + ?Sized>(&mut self, rng: &mut R, active: &[(CompetitorId, Personality)]) {
        if active.len() < 2 {
            return;
        }
        let interactions = (active.len() / 2).max(1);
        for _ in 0..interactions {
            let pair: Vec<&(CompetitorId, Personality)> = active.choose_multiple(rng, 2).collect();
            let (a, pa) = *pair[0];
            let (b, pb) = *pair[1];
            let delta = rng.gen_range(-4.0..8.0) * pa.compatibility(&pb);
            self.add_bond(a, b, delta);
            self.nudge_affinity(a, b, delta / 200.0);
            self.nudge_affinity(b, a, delta / 200.0);
        }
    }

    pub fn apply_nomination_penalty(&mut self, nominator: CompetitorId, nominee: CompetitorId) {
        self.add_bond(nominator, nominee, NOMINATION_BOND_PENALTY);
        self.nudge_affinity(nominator, nominee, -0.2);
        self.nudge_affinity(nominee, nominator, -0.3);
    }

    pub fn apply_veto_save(&mut self, holder: CompetitorId, saved: CompetitorId) {
        if holder == saved {
            return;
        }
        self.add_bond(holder, saved, VETO_SAVE_BOND_REWARD);
        self.nudge_affinity(saved, holder, 0.25);
    }

    pub fn apply_shared_vote(&mut self, voters: &[CompetitorId]) {
        for (i, a) in voters.iter().enumerate() {
            for b in &voters[i + 1..] {
                self.add_bond(*a, *b, SHARED_VOTE_BOND_REWARD);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::alliance::{CONFLICT_THRESHOLD, FORMATION_THRESHOLD};
    use crate::relationship::bond::{BOND_MAX, BOND_MIN};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ids(n: u32) -> Vec<CompetitorId> {
        (1..=n).map(CompetitorId).collect()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    fn bond_all(graph: &mut RelationshipGraph, members: &[CompetitorId], value: f64) {
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                graph.set_bond(*a, *b, value);
            }
        }
    }

    #[test]
    fn test_bond_is_symmetric() {
        let mut g = RelationshipGraph::new();
        g.set_bond(CompetitorId(1), CompetitorId(2), 25.0);
        assert_eq!(g.bond(CompetitorId(2), CompetitorId(1)), 25.0);

        g.add_bond(CompetitorId(2), CompetitorId(1), -5.0);
        assert_eq!(g.bond(CompetitorId(1), CompetitorId(2)), 20.0);
    }

    #[test]
    fn test_bond_stays_in_range_after_adjustments() {
        let mut g = RelationshipGraph::new();
        let (a, b) = (CompetitorId(1), CompetitorId(2));
        for delta in [80.0, 80.0, -300.0, 45.5, -12.0, 999.0] {
            g.add_bond(a, b, delta);
            let v = g.bond(a, b);
            assert!((BOND_MIN..=BOND_MAX).contains(&v), "bond {v} out of range");
        }
    }

    #[test]
    fn test_self_bond_ignored() {
        let mut g = RelationshipGraph::new();
        g.set_bond(CompetitorId(1), CompetitorId(1), 50.0);
        assert_eq!(g.bond(CompetitorId(1), CompetitorId(1)), 0.0);
        assert!(g.bonds().is_empty());
    }

    #[test]
    fn test_affinity_is_directed_and_clamped() {
        let mut g = RelationshipGraph::new();
        g.set_affinity(CompetitorId(1), CompetitorId(2), 0.6);
        assert_eq!(g.affinity(CompetitorId(2), CompetitorId(1)), 0.0);

        g.nudge_affinity(CompetitorId(1), CompetitorId(2), 5.0);
        assert_eq!(g.affinity(CompetitorId(1), CompetitorId(2)), 1.0);
    }

    #[test]
    fn test_tick_moves_bonds_monotonically_toward_zero() {
        let members = ids(6);
        let mut rng = rng();
        let mut g = RelationshipGraph::seeded(&members, &mut rng);
        g.set_bond(CompetitorId(1), CompetitorId(2), 37.5);
        g.set_bond(CompetitorId(3), CompetitorId(4), -22.0);

        let mut previous: Vec<f64> = g.bonds().iter().map(|(_, v)| v.abs()).collect();
        for _ in 0..50 {
            g.tick(&mut rng, &members);
            let current: Vec<f64> = g.bonds().iter().map(|(_, v)| v.abs()).collect();
            for (p, c) in previous.iter().zip(&current) {
                assert!(c <= p);
            }
            previous = current;
        }
        assert!(previous.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_formed_alliance_members_exceed_threshold() {
        let members = ids(5);
        let mut g = RelationshipGraph::new();
        bond_all(&mut g, &members, 80.0);

        let mut rng = rng();
        let mut formed = Vec::new();
        for _ in 0..10 {
            formed.extend(g.tick(&mut rng, &members).formed);
        }
        assert!(!formed.is_empty());

        for alliance in g.alliances() {
            assert!((3..=6).contains(&alliance.members().len()));
        }
    }

    #[test]
    fn test_try_form_checks_threshold_and_duplicates() {
        let members = ids(3);
        let mut g = RelationshipGraph::new();
        bond_all(&mut g, &members, FORMATION_THRESHOLD + 1.0);

        let id = g.try_form(members.clone());
        assert!(id.is_some());
        assert!(g.try_form(vec![CompetitorId(3), CompetitorId(1), CompetitorId(2)]).is_none());
        assert_eq!(g.alliances().len(), 1);

        let mut weak = RelationshipGraph::new();
        bond_all(&mut weak, &members, FORMATION_THRESHOLD);
        assert!(weak.try_form(members).is_none());
    }

    #[test]
    fn test_alliance_pruned_within_one_tick_of_conflict() {
        let members = ids(3);
        let mut g = RelationshipGraph::new();
        bond_all(&mut g, &members, 60.0);
        let id = g.try_form(members.clone()).unwrap();

        g.set_bond(CompetitorId(1), CompetitorId(3), CONFLICT_THRESHOLD - 2.0);
        let report = g.tick(&mut rng(), &members);

        assert!(report.pruned.contains(&(id, PruneReason::Conflict)));
        assert!(g.alliances().iter().all(|a| a.id != id));
    }

    #[test]
    fn test_evicted_members_dropped_on_tick() {
        let members = ids(4);
        let mut g = RelationshipGraph::new();
        bond_all(&mut g, &members, 90.0);
        g.try_form(members.clone()).unwrap();

        let remaining = vec![CompetitorId(1), CompetitorId(2), CompetitorId(3)];
        g.tick(&mut rng(), &remaining);

        let alliance = g.alliances_of(CompetitorId(1)).next().unwrap();
        assert!(!alliance.contains(CompetitorId(4)));
        assert!(g.share_alliance(CompetitorId(1), CompetitorId(2)));
        assert!(!g.share_alliance(CompetitorId(1), CompetitorId(4)));
    }

    #[test]
    fn test_nomination_penalty() {
        let mut g = RelationshipGraph::new();
        let (hoh, nom) = (CompetitorId(1), CompetitorId(2));
        g.apply_nomination_penalty(hoh, nom);

        assert_eq!(g.bond(hoh, nom), NOMINATION_BOND_PENALTY);
        assert!(g.affinity(hoh, nom) < 0.0);
        assert!(g.affinity(nom, hoh) < g.affinity(hoh, nom));
    }

    #[test]
    fn test_veto_save_and_shared_vote_rewards() {
        let mut g = RelationshipGraph::new();
        g.apply_veto_save(CompetitorId(1), CompetitorId(2));
        assert_eq!(g.bond(CompetitorId(1), CompetitorId(2)), VETO_SAVE_BOND_REWARD);
        assert!(g.affinity(CompetitorId(2), CompetitorId(1)) > 0.0);

        g.apply_shared_vote(&ids(3));
        assert_eq!(g.bond(CompetitorId(2), CompetitorId(3)), SHARED_VOTE_BOND_REWARD);
        assert_eq!(
            g.bond(CompetitorId(1), CompetitorId(2)),
            VETO_SAVE_BOND_REWARD + SHARED_VOTE_BOND_REWARD
        );
    }

    #[test]
    fn test_socialize_touches_bonds() {
        let roster: Vec<(CompetitorId, Personality)> =
            ids(6).into_iter().map(|id| (id, Personality::default())).collect();
        let mut g = RelationshipGraph::new();
        g.socialize(&mut rng(), &roster);
        assert!(!g.bonds().is_empty());
    }
}
