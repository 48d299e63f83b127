//! Competitor entity and its value objects

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stable identifier of a competitor within one season
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CompetitorId(pub u32);

impl std::fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Personality vector driving AI social behavior (each trait in 0..=1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub aggression: f64,
    pub loyalty: f64,
    pub chaos: f64,
}

impl Personality {
    pub fn new(aggression: f64, loyalty: f64, chaos: f64) -> Self {
        Self {
            aggression: aggression.clamp(0.0, 1.0),
            loyalty: loyalty.clamp(0.0, 1.0),
            chaos: chaos.clamp(0.0, 1.0),
        }
    }

    /// Draw a personality uniformly from the unit cube
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        )
    }

    /// Multiplier applied to social interaction deltas between two competitors.
    ///
    /// Loyal pairs bond faster; aggressive pairs and mismatched chaos slow it down.
    /// The result stays within roughly `0.45..=1.5`.
    pub fn compatibility(&self, other: &Personality) -> f64 {
        let loyalty = (self.loyalty + other.loyalty) / 2.0;
        let aggression = (self.aggression + other.aggression) / 2.0;
        let chaos_gap = (self.chaos - other.chaos).abs();
        (1.0 + 0.5 * loyalty - 0.4 * aggression - 0.3 * chaos_gap).clamp(0.3, 1.5)
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }
}

/// Play style assigned at roster build; biases competition aptitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Competitor,
    Strategist,
    Socialite,
    Floater,
    Wildcard,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Competitor,
        Archetype::Strategist,
        Archetype::Socialite,
        Archetype::Floater,
        Archetype::Wildcard,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Archetype::Competitor => "competitor",
            Archetype::Strategist => "strategist",
            Archetype::Socialite => "socialite",
            Archetype::Floater => "floater",
            Archetype::Wildcard => "wildcard",
        }
    }

    /// Bias added to the base comp rating of 0.5
    pub fn comp_bias<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Archetype::Competitor => 0.25,
            Archetype::Strategist => 0.05,
            Archetype::Socialite => -0.10,
            Archetype::Floater => -0.15,
            Archetype::Wildcard => rng.gen_range(-0.20..0.20),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "competitor" => Ok(Archetype::Competitor),
            "strategist" => Ok(Archetype::Strategist),
            "socialite" => Ok(Archetype::Socialite),
            "floater" => Ok(Archetype::Floater),
            "wildcard" => Ok(Archetype::Wildcard),
            other => Err(format!("Unknown archetype: {}", other)),
        }
    }
}

pub const MIN_COMP_RATING: f64 = 0.05;
pub const MAX_COMP_RATING: f64 = 0.95;

/// A competitor in the house (Entity)
///
/// Created once at roster build and mutated for the rest of the season.
/// Competitors are never removed; eviction only sets a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub is_human: bool,
    pub archetype: Archetype,
    pub personality: Personality,
    pub skill: f64,
    pub comp_rating: f64,
    pub threat: f64,
    pub nominated: bool,
    pub power_holder: bool,
    pub evicted: bool,
    pub power_wins: u32,
    pub veto_wins: u32,
    pub final_wins: u32,
    pub times_nominated: u32,
}

impl Competitor {
    pub fn new(id: CompetitorId, name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            id,
            name: name.into(),
            is_human: false,
            archetype,
            personality: Personality::default(),
            skill: 0.5,
            comp_rating: 0.5,
            threat: 0.0,
            nominated: false,
            power_holder: false,
            evicted: false,
            power_wins: 0,
            veto_wins: 0,
            final_wins: 0,
            times_nominated: 0,
        }
    }

    pub fn with_human(mut self, is_human: bool) -> Self {
        self.is_human = is_human;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_skill(mut self, skill: f64) -> Self {
        self.skill = skill.clamp(0.0, 1.0);
        self
    }

    pub fn with_comp_rating(mut self, rating: f64) -> Self {
        self.comp_rating = rating.clamp(MIN_COMP_RATING, MAX_COMP_RATING);
        self.recompute_threat();
        self
    }

    pub fn is_active(&self) -> bool {
        !self.evicted
    }

    pub fn total_wins(&self) -> u32 {
        self.power_wins + self.veto_wins + self.final_wins
    }

    /// Multiplier applied to a raw competition score
    pub fn score_multiplier(&self) -> f64 {
        0.8 + 0.4 * self.comp_rating
    }

    /// Threat is a function of aptitude and the competition record.
    pub fn recompute_threat(&mut self) {
        self.threat = (0.2 * self.comp_rating
            + 0.18 * self.power_wins as f64
            + 0.12 * self.veto_wins as f64
            + 0.1 * self.final_wins as f64)
            .clamp(0.0, 1.0);
    }

    pub fn record_power_win(&mut self) {
        self.power_wins += 1;
        self.recompute_threat();
    }

    pub fn record_veto_win(&mut self) {
        self.veto_wins += 1;
        self.recompute_threat();
    }

    pub fn record_final_win(&mut self) {
        self.final_wins += 1;
        self.recompute_threat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_personality_clamps() {
        let p = Personality::new(1.5, -0.2, 0.4);
        assert_eq!(p.aggression, 1.0);
        assert_eq!(p.loyalty, 0.0);
        assert_eq!(p.chaos, 0.4);
    }

    #[test]
    fn test_compatibility_prefers_loyal_calm_pairs() {
        let loyal = Personality::new(0.0, 1.0, 0.5);
        let hothead = Personality::new(1.0, 0.0, 0.0);
        let wild = Personality::new(1.0, 0.0, 1.0);

        assert!(loyal.compatibility(&loyal) > hothead.compatibility(&wild));
        assert_eq!(loyal.compatibility(&hothead), hothead.compatibility(&loyal));
    }

    #[test]
    fn test_comp_rating_is_clamped() {
        let c = Competitor::new(CompetitorId(1), "Ada", Archetype::Competitor).with_comp_rating(2.0);
        assert_eq!(c.comp_rating, MAX_COMP_RATING);

        let c = Competitor::new(CompetitorId(2), "Bo", Archetype::Floater).with_comp_rating(-1.0);
        assert_eq!(c.comp_rating, MIN_COMP_RATING);
    }

    #[test]
    fn test_threat_grows_with_wins() {
        let mut c = Competitor::new(CompetitorId(1), "Ada", Archetype::Strategist).with_comp_rating(0.5);
        let base = c.threat;

        c.record_veto_win();
        let after_veto = c.threat;
        c.record_power_win();

        assert!(after_veto > base);
        assert!(c.threat > after_veto);
        assert_eq!(c.total_wins(), 2);
    }

    #[test]
    fn test_threat_saturates_at_one() {
        let mut c = Competitor::new(CompetitorId(1), "Ada", Archetype::Competitor).with_comp_rating(0.9);
        for _ in 0..10 {
            c.record_power_win();
        }
        assert_eq!(c.threat, 1.0);
    }

    #[test]
    fn test_wildcard_bias_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let bias = Archetype::Wildcard.comp_bias(&mut rng);
            assert!((-0.2..0.2).contains(&bias));
        }
    }

    #[test]
    fn test_archetype_roundtrip() {
        for archetype in Archetype::ALL {
            let parsed: Archetype = archetype.as_str().parse().unwrap();
            assert_eq!(parsed, archetype);
        }
        assert!("villain".parse::<Archetype>().is_err());
    }

    #[test]
    fn test_competitor_id_display() {
        assert_eq!(CompetitorId(7).to_string(), "#7");
    }
}
