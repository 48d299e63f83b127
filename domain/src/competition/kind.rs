//! Competition kinds

use crate::season::phase::Phase;
use serde::{Deserialize, Serialize};

/// Which competition is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionKind {
    Power,
    Veto,
    FinalPart1,
    FinalPart2,
    FinalPart3,
}

impl CompetitionKind {
    pub fn from_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::PowerCompetition => Some(CompetitionKind::Power),
            Phase::Veto => Some(CompetitionKind::Veto),
            Phase::FinalComp1 => Some(CompetitionKind::FinalPart1),
            Phase::FinalComp2 => Some(CompetitionKind::FinalPart2),
            Phase::FinalComp3 => Some(CompetitionKind::FinalPart3),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            CompetitionKind::Power => Phase::PowerCompetition,
            CompetitionKind::Veto => Phase::Veto,
            CompetitionKind::FinalPart1 => Phase::FinalComp1,
            CompetitionKind::FinalPart2 => Phase::FinalComp2,
            CompetitionKind::FinalPart3 => Phase::FinalComp3,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CompetitionKind::Power => "power",
            CompetitionKind::Veto => "veto",
            CompetitionKind::FinalPart1 => "final_part_1",
            CompetitionKind::FinalPart2 => "final_part_2",
            CompetitionKind::FinalPart3 => "final_part_3",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            CompetitionKind::FinalPart1 | CompetitionKind::FinalPart2 | CompetitionKind::FinalPart3
        )
    }
}

impl std::fmt::Display for CompetitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
