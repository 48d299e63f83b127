//! Season phases

use serde::{Deserialize, Serialize};

/// Phase of a season
///
/// ```text
/// lobby → opening → power_competition → nomination → veto → veto_decision → eviction ─┐
///                         ▲                                                          │
///                         └──────────────── week += 1 ◀──────────────────────────────┘
///
/// 3 left:  final_comp_1 → final_comp_2 → final_comp_3 → final_decision → jury_vote → finale
/// twist:   eviction → jury_return → jury_return_vote → power_competition
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Opening,
    PowerCompetition,
    Nomination,
    Veto,
    VetoDecision,
    Eviction,
    JuryReturn,
    JuryReturnVote,
    #[serde(rename = "final_comp_1")]
    FinalComp1,
    #[serde(rename = "final_comp_2")]
    FinalComp2,
    #[serde(rename = "final_comp_3")]
    FinalComp3,
    FinalDecision,
    JuryVote,
    Finale,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Lobby => "lobby",
            Phase::Opening => "opening",
            Phase::PowerCompetition => "power_competition",
            Phase::Nomination => "nomination",
            Phase::Veto => "veto",
            Phase::VetoDecision => "veto_decision",
            Phase::Eviction => "eviction",
            Phase::JuryReturn => "jury_return",
            Phase::JuryReturnVote => "jury_return_vote",
            Phase::FinalComp1 => "final_comp_1",
            Phase::FinalComp2 => "final_comp_2",
            Phase::FinalComp3 => "final_comp_3",
            Phase::FinalDecision => "final_decision",
            Phase::JuryVote => "jury_vote",
            Phase::Finale => "finale",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Lobby => "Lobby",
            Phase::Opening => "Opening Night",
            Phase::PowerCompetition => "Power Competition",
            Phase::Nomination => "Nomination Ceremony",
            Phase::Veto => "Veto Competition",
            Phase::VetoDecision => "Veto Meeting",
            Phase::Eviction => "Live Eviction",
            Phase::JuryReturn => "Jury Return",
            Phase::JuryReturnVote => "Jury Return Vote",
            Phase::FinalComp1 => "Final Competition, Part 1",
            Phase::FinalComp2 => "Final Competition, Part 2",
            Phase::FinalComp3 => "Final Competition, Part 3",
            Phase::FinalDecision => "Final Decision",
            Phase::JuryVote => "Jury Vote",
            Phase::Finale => "Finale",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finale)
    }

    pub fn is_competition(&self) -> bool {
        matches!(
            self,
            Phase::PowerCompetition
                | Phase::Veto
                | Phase::FinalComp1
                | Phase::FinalComp2
                | Phase::FinalComp3
        )
    }

    /// Phases that only occur once three or fewer competitors remain
    pub fn is_endgame(&self) -> bool {
        matches!(
            self,
            Phase::FinalComp1
                | Phase::FinalComp2
                | Phase::FinalComp3
                | Phase::FinalDecision
                | Phase::JuryVote
                | Phase::Finale
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tag issued on every phase transition.
///
/// Deferred events and external commands carry the ticket of the phase
/// instance they were meant for; anything carrying an older ticket is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseTicket {
    pub phase: Phase,
    pub instance: u64,
}

impl std::fmt::Display for PhaseTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.phase.as_str(), self.instance)
    }
}
