//! Core domain concepts shared across all subdomains.
//!
//! - [`competitor::Competitor`] — a house guest and their per-season counters
//! - [`roster::Roster`] — the fixed cast of a season
//! - [`error::DomainError`] — domain-level errors

pub mod competitor;
pub mod error;
pub mod roster;
