//! Simulated competition play.

use async_trait::async_trait;
use house_application::ports::score_provider::{ScoreProvider, ScoreRequest};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Floor of every simulated score
pub const BASE_SCORE: f64 = 35.0;
/// Points a fully skilled competitor adds on top of the floor
pub const SKILL_WEIGHT: f64 = 45.0;
/// Width of the uniform luck term
pub const LUCK_RANGE: f64 = 30.0;

/// Scores AI competitors as `35 + 45·skill + U[0, 30)`.
///
/// The luck term comes from a generator seeded by the request, so the same
/// request always produces the same score no matter when it is played.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedScoreProvider;

impl SimulatedScoreProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, request: &ScoreRequest) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        let skill = request.skill.clamp(0.0, 1.0);
        BASE_SCORE + SKILL_WEIGHT * skill + rng.gen_range(0.0..LUCK_RANGE)
    }
}

#[async_trait]
impl ScoreProvider for SimulatedScoreProvider {
    async fn raw_score(&self, request: &ScoreRequest) -> Option<f64> {
        Some(self.score(request))
    }
}
