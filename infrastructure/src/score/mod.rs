//! Score providers for AI competitors.

mod simulated;

pub use simulated::SimulatedScoreProvider;
