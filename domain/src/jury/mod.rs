//! Jury vote domain
//!
//! ```text
//! shuffle jurors ─▶ one ballot each ─▶ tally (clinch at ⌊n/2⌋+1)
//!                                        │
//!                        tie? ─▶ tie-break provider ─▶ weighted draw fallback
//! ```

pub mod ballot;
pub mod resolver;
pub mod tally;

pub use ballot::{Ballot, BallotBox, BallotError};
pub use resolver::{
    AFFINITY_EPSILON, JuryVerdict, ai_ballot, shuffled_jurors, tie_break_bias, weighted_draw,
};
pub use tally::{JuryTally, TallyOutcome, majority_threshold};
