//! Season parameters — scheduler control.
//!
//! [`SeasonParams`] groups the static parameters of one season run: the
//! cast, the jury, timing, and twists. These are application-layer concerns;
//! the rules themselves live in the domain.

use house_domain::eviction::DEFAULT_JURY_SIZE;
use house_domain::competition::DEFAULT_VETO_PLAYERS;
use house_domain::{Phase, TwistConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base length of each waiting phase, before pace scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDurations {
    /// Lobby, opening, finale and other narration-only phases
    pub ceremony: Duration,
    /// Power, veto and final competitions
    pub competition: Duration,
    pub nomination: Duration,
    pub veto_decision: Duration,
    pub eviction: Duration,
    pub jury_return: Duration,
    pub final_decision: Duration,
    pub jury_vote: Duration,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            ceremony: Duration::from_secs(3),
            competition: Duration::from_secs(30),
            nomination: Duration::from_secs(20),
            veto_decision: Duration::from_secs(15),
            eviction: Duration::from_secs(20),
            jury_return: Duration::from_secs(20),
            final_decision: Duration::from_secs(15),
            jury_vote: Duration::from_secs(30),
        }
    }
}

impl PhaseDurations {
    pub fn for_phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::PowerCompetition
            | Phase::Veto
            | Phase::FinalComp1
            | Phase::FinalComp2
            | Phase::FinalComp3 => self.competition,
            Phase::Nomination => self.nomination,
            Phase::VetoDecision => self.veto_decision,
            Phase::Eviction => self.eviction,
            Phase::JuryReturn | Phase::JuryReturnVote => self.jury_return,
            Phase::FinalDecision => self.final_decision,
            Phase::JuryVote => self.jury_vote,
            Phase::Lobby | Phase::Opening | Phase::Finale => self.ceremony,
        }
    }

    /// Every phase the same length (handy for tests)
    pub fn uniform(duration: Duration) -> Self {
        Self {
            ceremony: duration,
            competition: duration,
            nomination: duration,
            veto_decision: duration,
            eviction: duration,
            jury_return: duration,
            final_decision: duration,
            jury_vote: duration,
        }
    }
}

/// Season run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonParams {
    pub roster_size: usize,
    /// Names to use first; the rest come from the built-in list
    pub names: Vec<String>,
    /// Name of the human-controlled competitor, if any
    pub human: Option<String>,
    pub jury_size: usize,
    pub veto_players: usize,
    /// Multiplier applied to every phase duration
    pub pace: f64,
    /// Upper bound on waiting for the presentation sink to go idle
    pub presentation_fallback: Duration,
    pub seed: Option<u64>,
    pub durations: PhaseDurations,
    pub twists: TwistConfig,
}

impl Default for SeasonParams {
    fn default() -> Self {
        Self {
            roster_size: 12,
            names: Vec::new(),
            human: None,
            jury_size: DEFAULT_JURY_SIZE,
            veto_players: DEFAULT_VETO_PLAYERS,
            pace: 1.0,
            presentation_fallback: Duration::from_secs(4),
            seed: None,
            durations: PhaseDurations::default(),
            twists: TwistConfig::default(),
        }
    }
}

impl SeasonParams {
    // ==================== Builder Methods ====================

    pub fn with_roster_size(mut self, size: usize) -> Self {
        self.roster_size = size;
        self
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_human(mut self, name: impl Into<String>) -> Self {
        self.human = Some(name.into());
        self
    }

    pub fn with_jury_size(mut self, size: usize) -> Self {
        self.jury_size = size;
        self
    }

    pub fn with_veto_players(mut self, players: usize) -> Self {
        self.veto_players = players;
        self
    }

    pub fn with_pace(mut self, pace: f64) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_presentation_fallback(mut self, fallback: Duration) -> Self {
        self.presentation_fallback = fallback;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_durations(mut self, durations: PhaseDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_twists(mut self, twists: TwistConfig) -> Self {
        self.twists = twists;
        self
    }

    /// Phase window after pace scaling
    pub fn window(&self, phase: Phase) -> Duration {
        self.durations.for_phase(phase).mul_f64(self.pace.max(0.0))
    }
}
