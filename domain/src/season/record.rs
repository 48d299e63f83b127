//! Season record: what happened each week and how it ended

use crate::core::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One eviction round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekRecord {
    pub week: u32,
    pub power_holder: Option<CompetitorId>,
    pub nominees: Vec<CompetitorId>,
    pub veto_holder: Option<CompetitorId>,
    pub veto_used_on: Option<CompetitorId>,
    pub replacement: Option<CompetitorId>,
    pub evicted: Option<CompetitorId>,
    /// Votes to evict, per nominee
    pub vote_counts: BTreeMap<CompetitorId, u32>,
}

impl WeekRecord {
    pub fn new(week: u32) -> Self {
        Self {
            week,
            ..Default::default()
        }
    }

    pub fn veto_used(&self) -> bool {
        self.veto_used_on.is_some()
    }
}

/// Outcome of a finished season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonResult {
    pub winner: CompetitorId,
    pub runner_up: Option<CompetitorId>,
    /// Displayed jury votes per finalist (includes the tie-break vote)
    pub jury_votes: BTreeMap<CompetitorId, u32>,
    pub tie_break_used: bool,
    pub weeks: Vec<WeekRecord>,
    pub jury: Vec<CompetitorId>,
    /// Evicted competitor who came back, if the twist fired
    pub returned: Option<CompetitorId>,
    pub seed: Option<u64>,
}

impl SeasonResult {
    pub fn total_jury_votes(&self) -> u32 {
        self.jury_votes.values().sum()
    }

    pub fn eviction_order(&self) -> Vec<CompetitorId> {
        self.weeks.iter().filter_map(|w| w.evicted).collect()
    }
}
