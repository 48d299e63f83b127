//! Human player port
//!
//! The scheduler notifies the UI when a human-controlled competitor has a
//! decision to make. Answers travel back through
//! [`SeasonHandle`](crate::use_cases::run_season::SeasonHandle), tagged with
//! the ticket from the turn, so a late answer is simply rejected as stale.
//!
//! ```text
//! scheduler ──on_turn(HumanTurn)──▶ UI
//!     ▲                              │
//!     └──── SeasonHandle::… ◀────────┘
//! ```

use house_domain::{CompetitionKind, CompetitorId, PhaseTicket};

/// Decision requested from a human
#[derive(Debug, Clone, PartialEq)]
pub enum HumanRequest {
    /// Play a competition and submit a raw score
    Compete { kind: CompetitionKind },
    /// Pick exactly `slots` nominees from `pool`
    Nominate { pool: Vec<CompetitorId>, slots: usize },
    /// Use the veto on one of `nominees`, or decline
    UseVeto { nominees: Vec<CompetitorId> },
    /// Name a replacement nominee from `pool`
    NameReplacement { pool: Vec<CompetitorId> },
    /// Vote to evict one of `nominees`
    EvictionVote { nominees: Vec<CompetitorId> },
    /// As power-holder, break an eviction tie between `tied`
    BreakEvictionTie { tied: Vec<CompetitorId> },
    /// As final power-holder, cut one of `candidates`
    FinalDecision { candidates: Vec<CompetitorId> },
    /// As a juror, vote for a winner
    JuryBallot { finalists: Vec<CompetitorId> },
    /// Vote for a juror to return to the game
    ReturnVote { jurors: Vec<CompetitorId> },
}

impl HumanRequest {
    pub fn as_str(&self) -> &str {
        match self {
            HumanRequest::Compete { .. } => "compete",
            HumanRequest::Nominate { .. } => "nominate",
            HumanRequest::UseVeto { .. } => "use_veto",
            HumanRequest::NameReplacement { .. } => "name_replacement",
            HumanRequest::EvictionVote { .. } => "eviction_vote",
            HumanRequest::BreakEvictionTie { .. } => "break_eviction_tie",
            HumanRequest::FinalDecision { .. } => "final_decision",
            HumanRequest::JuryBallot { .. } => "jury_ballot",
            HumanRequest::ReturnVote { .. } => "return_vote",
        }
    }
}

/// A pending human decision
#[derive(Debug, Clone, PartialEq)]
pub struct HumanTurn {
    pub ticket: PhaseTicket,
    pub competitor: CompetitorId,
    pub request: HumanRequest,
}

/// Port notified when a human must act
///
/// `on_turn` must not block; the UI answers later through the handle.
pub trait HumanPlayerPort: Send + Sync {
    fn on_turn(&self, turn: &HumanTurn);

    /// The decision window for `ticket` closed (answered or timed out).
    fn on_turn_closed(&self, _ticket: PhaseTicket) {}
}

/// No human at the table; every human slot falls back to the AI choice
pub struct NoHumanPlayer;

impl HumanPlayerPort for NoHumanPlayer {
    fn on_turn(&self, _turn: &HumanTurn) {}
}
