//! Alliances: mutually reinforcing subsets of competitors

use crate::core::competitor::CompetitorId;
use crate::relationship::bond::BondMatrix;
use serde::{Deserialize, Serialize};

pub const MIN_ALLIANCE_SIZE: usize = 3;
pub const MAX_ALLIANCE_SIZE: usize = 6;

/// Every pairwise bond must exceed this for an alliance to form
pub const FORMATION_THRESHOLD: f64 = 30.0;
/// An alliance whose mean pairwise bond drops below this is disbanded
pub const PRUNE_COHESION: f64 = 20.0;
/// Any single pairwise bond below this breaks the alliance
pub const CONFLICT_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllianceId(pub u32);

impl std::fmt::Display for AllianceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "alliance-{}", self.0)
    }
}

/// Why an alliance was disbanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneReason {
    TooFewMembers,
    LowCohesion,
    Conflict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    members: Vec<CompetitorId>,
    pub cohesion: f64,
    pub formed_tick: u64,
}

impl Alliance {
    pub fn new(id: AllianceId, mut members: Vec<CompetitorId>, formed_tick: u64) -> Self {
        members.sort();
        members.dedup();
        Self {
            id,
            members,
            cohesion: 0.0,
            formed_tick,
        }
    }

    pub fn members(&self) -> &[CompetitorId] {
        &self.members
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.members.binary_search(&id).is_ok()
    }

    pub fn has_members(&self, other: &[CompetitorId]) -> bool {
        let mut sorted = other.to_vec();
        sorted.sort();
        sorted.dedup();
        sorted == self.members
    }

    /// Drop members that are no longer in the game
    pub fn retain_members(&mut self, keep: impl Fn(CompetitorId) -> bool) {
        self.members.retain(|id| keep(*id));
    }

    pub fn pairs(&self) -> impl Iterator<Item = (CompetitorId, CompetitorId)> + '_ {
        self.members
            .iter()
            .enumerate()
            .flat_map(move |(i, a)| self.members[i + 1..].iter().map(move |b| (*a, *b)))
    }

    pub fn recompute_cohesion(&mut self, bonds: &BondMatrix) {
        self.cohesion = mean_pairwise_bond(&self.members, bonds);
    }

    /// Reason this alliance should be pruned, if any
    pub fn disqualification(&self, bonds: &BondMatrix) -> Option<PruneReason> {
        if self.members.len() < 2 {
            return Some(PruneReason::TooFewMembers);
        }
        if self.pairs().any(|(a, b)| bonds.get(a, b) < CONFLICT_THRESHOLD) {
            return Some(PruneReason::Conflict);
        }
        if self.cohesion < PRUNE_COHESION {
            return Some(PruneReason::LowCohesion);
        }
        None
    }
}

pub fn mean_pairwise_bond(members: &[CompetitorId], bonds: &BondMatrix) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            total += bonds.get(*a, *b);
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// True when every pairwise bond in `members` exceeds [`FORMATION_THRESHOLD`]
pub fn qualifies_for_formation(members: &[CompetitorId], bonds: &BondMatrix) -> bool {
    if !(MIN_ALLIANCE_SIZE..=MAX_ALLIANCE_SIZE).contains(&members.len()) {
        return false;
    }
    members.iter().enumerate().all(|(i, a)| {
        members[i + 1..]
            .iter()
            .all(|b| bonds.get(*a, *b) > FORMATION_THRESHOLD)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CompetitorId> {
        raw.iter().map(|n| CompetitorId(*n)).collect()
    }

    fn bonds_all(members: &[CompetitorId], value: f64) -> BondMatrix {
        let mut m = BondMatrix::default();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                m.set(*a, *b, value);
            }
        }
        m
    }

    #[test]
    fn test_members_sorted_and_deduped() {
        let a = Alliance::new(AllianceId(1), ids(&[3, 1, 2, 1]), 0);
        assert_eq!(a.members(), ids(&[1, 2, 3]).as_slice());
        assert!(a.has_members(&ids(&[2, 3, 1])));
        assert!(!a.has_members(&ids(&[1, 2])));
    }

    #[test]
    fn test_pairs_enumerates_each_once() {
        let a = Alliance::new(AllianceId(1), ids(&[1, 2, 3, 4]), 0);
        assert_eq!(a.pairs().count(), 6);
    }

    #[test]
    fn test_formation_requires_every_pair_above_threshold() {
        let members = ids(&[1, 2, 3]);
        let mut bonds = bonds_all(&members, 40.0);
        assert!(qualifies_for_formation(&members, &bonds));

        bonds.set(CompetitorId(2), CompetitorId(3), FORMATION_THRESHOLD);
        assert!(!qualifies_for_formation(&members, &bonds));
    }

    #[test]
    fn test_formation_size_bounds() {
        let pair = ids(&[1, 2]);
        assert!(!qualifies_for_formation(&pair, &bonds_all(&pair, 90.0)));

        let seven = ids(&[1, 2, 3, 4, 5, 6, 7]);
        assert!(!qualifies_for_formation(&seven, &bonds_all(&seven, 90.0)));
    }

    #[test]
    fn test_disqualification_reasons() {
        let members = ids(&[1, 2, 3]);
        let mut bonds = bonds_all(&members, 40.0);
        let mut a = Alliance::new(AllianceId(1), members.clone(), 0);
        a.recompute_cohesion(&bonds);
        assert_eq!(a.disqualification(&bonds), None);

        bonds.set(CompetitorId(1), CompetitorId(2), 4.0);
        a.recompute_cohesion(&bonds);
        assert_eq!(a.disqualification(&bonds), Some(PruneReason::Conflict));

        let low = bonds_all(&members, 15.0);
        a.recompute_cohesion(&low);
        assert_eq!(a.disqualification(&low), Some(PruneReason::LowCohesion));

        a.retain_members(|id| id == CompetitorId(1));
        assert_eq!(a.disqualification(&low), Some(PruneReason::TooFewMembers));
    }
}
