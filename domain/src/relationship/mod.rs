//! Social simulation domain
//!
//! Bonds are symmetric and decay every tick; affinities are directed and
//! move only through events; alliances form from high-bond subsets and are
//! pruned as bonds erode.
//!
//! ```text
//! tick():  decay bonds ─▶ recompute cohesion ─▶ prune ─▶ attempt formation
//! ```

pub mod alliance;
pub mod bond;
pub mod graph;

pub use alliance::{Alliance, AllianceId, PruneReason};
pub use bond::{BondMatrix, PairKey};
pub use graph::{RelationshipGraph, TickReport};
