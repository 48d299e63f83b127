//! Symmetric bond storage

use crate::core::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BOND_MIN: f64 = -100.0;
pub const BOND_MAX: f64 = 100.0;

/// Unordered pair key; `(a, b)` and `(b, a)` map to the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(CompetitorId, CompetitorId);

impl PairKey {
    /// Returns `None` for a self-pair.
    pub fn new(a: CompetitorId, b: CompetitorId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> CompetitorId {
        self.0
    }

    pub fn high(&self) -> CompetitorId {
        self.1
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// Move `value` one `step` toward zero without crossing it
pub fn decay_toward_zero(value: f64, step: f64) -> f64 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        0.0
    }
}

/// Bond values for every unordered pair; missing pairs read as 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BondMatrix {
    values: BTreeMap<PairKey, f64>,
}

impl BondMatrix {
    pub fn get(&self, a: CompetitorId, b: CompetitorId) -> f64 {
        PairKey::new(a, b)
            .and_then(|key| self.values.get(&key).copied())
            .unwrap_or(0.0)
    }

    /// Store a clamped value and return the previous one.
    pub fn set(&mut self, a: CompetitorId, b: CompetitorId, value: f64) -> Option<f64> {
        let key = PairKey::new(a, b)?;
        let clamped = value.clamp(BOND_MIN, BOND_MAX);
        Some(self.values.insert(key, clamped).unwrap_or(0.0))
    }

    pub fn decay_all(&mut self, step: f64) {
        for value in self.values.values_mut() {
            *value = decay_toward_zero(*value, step);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &f64)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
