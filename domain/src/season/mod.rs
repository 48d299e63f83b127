//! Season state machine domain
//!
//! Phases, tickets, the per-instance commit guard and the game state the
//! scheduler mutates.

pub mod commit;
pub mod phase;
pub mod record;
pub mod state;
pub mod twist;

pub use commit::{CommitRejection, CommitState, PhaseCommit};
pub use phase::{Phase, PhaseTicket};
pub use record::{SeasonResult, WeekRecord};
pub use state::GameState;
pub use twist::TwistConfig;
