//! Nomination ceremony beats

use crate::core::competitor::CompetitorId;
use serde::{Deserialize, Serialize};

/// One narrated step of the ceremony, presented in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "beat", rename_all = "snake_case")]
pub enum CeremonyBeat {
    HouseAddress,
    Reveal { slot: usize, nominee: CompetitorId },
    Adjournment,
}

impl CeremonyBeat {
    pub fn as_str(&self) -> &str {
        match self {
            CeremonyBeat::HouseAddress => "house_address",
            CeremonyBeat::Reveal { .. } => "reveal",
            CeremonyBeat::Adjournment => "adjournment",
        }
    }
}

/// Address, one reveal per nominee, adjournment
pub fn ceremony_beats(nominees: &[CompetitorId]) -> Vec<CeremonyBeat> {
    let mut beats = Vec::with_capacity(nominees.len() + 2);
    beats.push(CeremonyBeat::HouseAddress);
    beats.extend(
        nominees
            .iter()
            .enumerate()
            .map(|(idx, nominee)| CeremonyBeat::Reveal {
                slot: idx + 1,
                nominee: *nominee,
            }),
    );
    beats.push(CeremonyBeat::Adjournment);
    beats
}
