//! Score provider port
//!
//! Competitions are opaque to the season: something produces a raw score for
//! a competitor and the scheduler scales it by comp rating.

use async_trait::async_trait;
use house_domain::{CompetitionKind, CompetitorId};

/// What a provider needs to produce one raw score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    pub competitor: CompetitorId,
    pub kind: CompetitionKind,
    /// Competitor skill in 0..=1
    pub skill: f64,
    /// Drawn from the season generator so a fixed seed reproduces scores
    pub seed: u64,
}

/// Port for producing raw competition scores
///
/// Returning `None` means "no score"; the competitor then receives the
/// default score when the competition resolves.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    async fn raw_score(&self, request: &ScoreRequest) -> Option<f64>;
}

/// Provider that never scores; every competitor falls back to the default
pub struct NoScoreProvider;

#[async_trait]
impl ScoreProvider for NoScoreProvider {
    async fn raw_score(&self, _request: &ScoreRequest) -> Option<f64> {
        None
    }
}
