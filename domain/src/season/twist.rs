//! Optional season twists

use serde::{Deserialize, Serialize};

pub const DEFAULT_NOMINEE_SLOTS: usize = 2;
pub const MIN_NOMINEE_SLOTS: usize = 2;
pub const MAX_NOMINEE_SLOTS: usize = 4;

/// Twist toggles read from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwistConfig {
    /// Override for the number of nominees (clamped to 2..=4)
    pub nominee_slots: Option<u8>,
    /// Week with two evictions
    pub double_eviction_week: Option<u32>,
    /// Week with three evictions
    pub triple_eviction_week: Option<u32>,
    /// Allow one evicted juror back into the game
    pub jury_return: bool,
    /// Living count that triggers the jury return
    pub jury_return_at: usize,
    /// Duration multiplier for the extra rounds of a multi-eviction week
    pub fast_week_factor: f64,
}

impl Default for TwistConfig {
    fn default() -> Self {
        Self {
            nominee_slots: None,
            double_eviction_week: None,
            triple_eviction_week: None,
            jury_return: false,
            jury_return_at: 5,
            fast_week_factor: 0.5,
        }
    }
}

impl TwistConfig {
    pub fn nominee_slots(&self) -> usize {
        self.nominee_slots
            .map(|n| (n as usize).clamp(MIN_NOMINEE_SLOTS, MAX_NOMINEE_SLOTS))
            .unwrap_or(DEFAULT_NOMINEE_SLOTS)
    }

    /// Number of evictions scheduled for `week`
    pub fn evictions_in_week(&self, week: u32) -> u32 {
        if self.triple_eviction_week == Some(week) {
            3
        } else if self.double_eviction_week == Some(week) {
            2
        } else {
            1
        }
    }

    pub fn with_nominee_slots(mut self, slots: u8) -> Self {
        self.nominee_slots = Some(slots);
        self
    }

    pub fn with_double_eviction(mut self, week: u32) -> Self {
        self.double_eviction_week = Some(week);
        self
    }

    pub fn with_triple_eviction(mut self, week: u32) -> Self {
        self.triple_eviction_week = Some(week);
        self
    }

    pub fn with_jury_return(mut self, at: usize) -> Self {
        self.jury_return = true;
        self.jury_return_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        assert_eq!(TwistConfig::default().nominee_slots(), 2);
    }

    #[test]
    fn test_slot_override_is_clamped() {
        assert_eq!(TwistConfig::default().with_nominee_slots(3).nominee_slots(), 3);
        assert_eq!(TwistConfig::default().with_nominee_slots(9).nominee_slots(), 4);
        assert_eq!(TwistConfig::default().with_nominee_slots(1).nominee_slots(), 2);
    }

    #[test]
    fn test_evictions_in_week() {
        let twists = TwistConfig::default()
            .with_double_eviction(3)
            .with_triple_eviction(5);
        assert_eq!(twists.evictions_in_week(1), 1);
        assert_eq!(twists.evictions_in_week(3), 2);
        assert_eq!(twists.evictions_in_week(5), 3);
    }
}
