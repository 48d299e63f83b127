//! Tie-break port
//!
//! Consulted only when the jury splits evenly, and then exactly once.

use async_trait::async_trait;
use house_domain::CompetitorId;

#[derive(Debug, Clone, PartialEq)]
pub struct TieBreakRequest {
    pub finalists: [CompetitorId; 2],
    /// Suggested probability that the first finalist should win
    pub bias_toward_first: f64,
}

/// Port for deciding a tied jury vote
///
/// An answer that is `None` or not one of the finalists falls back to a
/// weighted draw from the season generator.
#[async_trait]
pub trait TieBreakPort: Send + Sync {
    async fn break_tie(&self, request: &TieBreakRequest) -> Option<CompetitorId>;
}

/// Never answers; ties go to the weighted draw
pub struct NoTieBreak;

#[async_trait]
impl TieBreakPort for NoTieBreak {
    async fn break_tie(&self, _request: &TieBreakRequest) -> Option<CompetitorId> {
        None
    }
}
