//! Season random source.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// The generator a season draws from: seeded for replays, entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => {
            debug!("Season generator seeded with {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = seeded_rng(Some(11));
        let mut b = seeded_rng(Some(11));
        let left: Vec<u32> = (0..8).map(|_| a.gen_range(0..1000)).collect();
        let right: Vec<u32> = (0..8).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = seeded_rng(Some(1));
        let mut b = seeded_rng(Some(2));
        let left: Vec<u64> = (0..4).map(|_| a.gen_range(0..u64::MAX)).collect();
        let right: Vec<u64> = (0..4).map(|_| b.gen_range(0..u64::MAX)).collect();
        assert_ne!(left, right);
    }
}
