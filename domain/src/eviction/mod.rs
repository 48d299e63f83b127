//! Veto meeting, eviction vote, jury seating and the jury return twist

pub mod jury_return;
pub mod veto;
pub mod vote;

pub use jury_return::{ai_return_vote, reinstate, returning_juror, should_trigger};
pub use veto::{SAVE_AFFINITY, ai_veto_choice, apply_veto, place_replacement};
pub use vote::{
    DEFAULT_JURY_SIZE, EvictionCount, EvictionTally, Seat, ai_eviction_vote, ai_final_decision,
    eviction_voters, seat_evictee,
};
