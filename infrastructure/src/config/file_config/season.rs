//! Cast and pacing from TOML (`[season]` section)

use serde::{Deserialize, Serialize};

/// Raw season configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSeasonConfig {
    pub roster_size: usize,
    /// Names used first; the rest come from the built-in list
    pub names: Vec<String>,
    /// Competitor controlled from the terminal
    pub human: Option<String>,
    pub jury_size: usize,
    pub veto_players: usize,
    /// Multiplier on every phase duration
    pub pace: f64,
    /// Longest wait for narration to finish, in milliseconds
    pub presentation_fallback_ms: u64,
    pub seed: Option<u64>,
}

impl Default for FileSeasonConfig {
    fn default() -> Self {
        Self {
            roster_size: 12,
            names: Vec::new(),
            human: None,
            jury_size: house_domain::eviction::DEFAULT_JURY_SIZE,
            veto_players: house_domain::competition::DEFAULT_VETO_PLAYERS,
            pace: 1.0,
            presentation_fallback_ms: 4000,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_season_keeps_defaults() {
        let config: FileSeasonConfig = toml::from_str("seed = 9\nhuman = \"Ada\"").unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.human.as_deref(), Some("Ada"));
        assert_eq!(config.roster_size, 12);
        assert_eq!(config.presentation_fallback_ms, 4000);
    }
}
