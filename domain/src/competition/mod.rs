//! Competition domain
//!
//! Eligibility rules for each competition kind and the resolver that turns
//! submitted scores into a single winner.

pub mod eligibility;
pub mod kind;
pub mod resolver;

pub use eligibility::{
    DEFAULT_VETO_PLAYERS, eligible_for, final_part_eligible, power_competition_eligible,
    veto_players,
};
pub use kind::CompetitionKind;
pub use resolver::{CompetitionOutcome, CompetitionResolver, ScoreRejection, apply_win};
