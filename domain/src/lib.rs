//! Domain layer for house-game
//!
//! This crate contains the season rules, entities, and the social simulation.
//! It has no dependencies on infrastructure or presentation concerns, and it
//! never constructs a random generator: every probabilistic step draws from
//! one passed in by the caller.
//!
//! # Core Concepts
//!
//! ## Season
//!
//! A season is a loop of weeks: power competition, nomination, veto,
//! eviction. When three competitors remain it diverts into a three-part final
//! competition, a final decision, and the jury vote.
//!
//! ## Relationships
//!
//! - **Bond**: symmetric, decays toward zero every social tick
//! - **Affinity**: directed, moves only through events
//! - **Alliance**: a high-bond subset, pruned as bonds erode

pub mod competition;
pub mod config;
pub mod core;
pub mod eviction;
pub mod jury;
pub mod nomination;
pub mod relationship;
pub mod season;

// Re-export commonly used types
pub use competition::{CompetitionKind, CompetitionOutcome, CompetitionResolver, ScoreRejection};
pub use config::OutputFormat;
pub use core::{
    competitor::{Archetype, Competitor, CompetitorId, Personality},
    error::DomainError,
    roster::{MAX_ROSTER, MIN_ROSTER, Roster, RosterBuilder},
};
pub use eviction::{EvictionCount, EvictionTally, Seat};
pub use jury::{Ballot, BallotBox, BallotError, JuryTally, JuryVerdict, TallyOutcome};
pub use nomination::{CeremonyBeat, NominationError};
pub use relationship::{Alliance, AllianceId, RelationshipGraph, TickReport};
pub use season::{
    CommitRejection, CommitState, GameState, Phase, PhaseTicket, SeasonResult, TwistConfig,
    WeekRecord,
};
