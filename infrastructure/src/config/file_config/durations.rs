//! Phase lengths from TOML (`[durations]` section, in seconds)

use house_application::PhaseDurations;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDurationsConfig {
    pub ceremony: f64,
    pub competition: f64,
    pub nomination: f64,
    pub veto_decision: f64,
    pub eviction: f64,
    pub jury_return: f64,
    pub final_decision: f64,
    pub jury_vote: f64,
}

impl Default for FileDurationsConfig {
    fn default() -> Self {
        let base = PhaseDurations::default();
        Self {
            ceremony: base.ceremony.as_secs_f64(),
            competition: base.competition.as_secs_f64(),
            nomination: base.nomination.as_secs_f64(),
            veto_decision: base.veto_decision.as_secs_f64(),
            eviction: base.eviction.as_secs_f64(),
            jury_return: base.jury_return.as_secs_f64(),
            final_decision: base.final_decision.as_secs_f64(),
            jury_vote: base.jury_vote.as_secs_f64(),
        }
    }
}

impl FileDurationsConfig {
    /// Every configured value, labelled, for validation
    pub(super) fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("ceremony", self.ceremony),
            ("competition", self.competition),
            ("nomination", self.nomination),
            ("veto_decision", self.veto_decision),
            ("eviction", self.eviction),
            ("jury_return", self.jury_return),
            ("final_decision", self.final_decision),
            ("jury_vote", self.jury_vote),
        ]
    }

    /// Convert to [`PhaseDurations`]. Call after validation; negative or
    /// non-finite values collapse to zero.
    pub fn to_phase_durations(&self) -> PhaseDurations {
        let secs = |value: f64| Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO);
        PhaseDurations {
            ceremony: secs(self.ceremony),
            competition: secs(self.competition),
            nomination: secs(self.nomination),
            veto_decision: secs(self.veto_decision),
            eviction: secs(self.eviction),
            jury_return: secs(self.jury_return),
            final_decision: secs(self.final_decision),
            jury_vote: secs(self.jury_vote),
        }
    }
}
