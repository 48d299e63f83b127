//! Nomination domain

pub mod ceremony;
pub mod engine;

pub use ceremony::{CeremonyBeat, ceremony_beats};
pub use engine::{
    ALLY_PROTECTION, NominationError, ai_replacement, ai_select, eligible_pool, finalize,
    nomination_score, rank_candidates, replacement_pool, slots, validate,
};
