//! Roster of a season and its builder

use crate::core::competitor::{Archetype, Competitor, CompetitorId, Personality};
use crate::core::error::DomainError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_ROSTER: usize = 3;
pub const MAX_ROSTER: usize = 24;

/// Names used when the configuration does not provide enough of its own
pub const DEFAULT_NAMES: [&str; MAX_ROSTER] = [
    "Avery", "Blake", "Casey", "Dakota", "Emery", "Finley", "Gray", "Harper", "Indigo", "Jules",
    "Kai", "Logan", "Marlowe", "Noel", "Oakley", "Parker", "Quinn", "Reese", "Sage", "Tatum",
    "Umber", "Vale", "Wren", "Yael",
];

/// The cast of one season, ordered by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    competitors: Vec<Competitor>,
}

impl Roster {
    pub fn new(mut competitors: Vec<Competitor>) -> Self {
        competitors.sort_by_key(|c| c.id);
        Self { competitors }
    }

    pub fn all(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    pub fn get(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|idx| &self.competitors[idx])
    }

    pub fn get_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|idx| &mut self.competitors[idx])
    }

    /// Display name, or the id when unknown
    pub fn name_of(&self, id: CompetitorId) -> String {
        self.get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn find_by_name(&self, name: &str) -> Option<CompetitorId> {
        let needle = name.trim();
        self.competitors
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(needle))
            .map(|c| c.id)
    }

    pub fn is_living(&self, id: CompetitorId) -> bool {
        self.get(id).is_some_and(Competitor::is_active)
    }

    pub fn is_human(&self, id: CompetitorId) -> bool {
        self.get(id).is_some_and(|c| c.is_human)
    }

    pub fn threat_of(&self, id: CompetitorId) -> f64 {
        self.get(id).map(|c| c.threat).unwrap_or(0.0)
    }

    /// Ids of competitors not yet evicted, ascending
    pub fn living_ids(&self) -> Vec<CompetitorId> {
        self.competitors
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.id)
            .collect()
    }

    pub fn living_count(&self) -> usize {
        self.competitors.iter().filter(|c| c.is_active()).count()
    }

    pub fn personality_of(&self, id: CompetitorId) -> Personality {
        self.get(id).map(|c| c.personality).unwrap_or_default()
    }

    /// Clear every power-holder flag and hand power to `winner`.
    pub fn crown_power_holder(&mut self, winner: CompetitorId) {
        self.hand_power_to(winner);
        if let Some(c) = self.get_mut(winner) {
            c.record_power_win();
        }
    }

    /// Move the power-holder flag without counting a win.
    pub fn hand_power_to(&mut self, holder: CompetitorId) {
        for c in &mut self.competitors {
            c.power_holder = c.id == holder;
        }
    }

    pub fn clear_nominations(&mut self) {
        for c in &mut self.competitors {
            c.nominated = false;
        }
    }

    pub fn power_holders(&self) -> Vec<CompetitorId> {
        self.competitors
            .iter()
            .filter(|c| c.power_holder)
            .map(|c| c.id)
            .collect()
    }
}

/// Builds a [`Roster`] from names, drawing traits from the injected generator
///
/// # Example
///
/// ```
/// use house_domain::core::roster::RosterBuilder;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let roster = RosterBuilder::new(["Ada", "Bo", "Cy", "Di"])
///     .with_human("Bo")
///     .build(&mut rng)
///     .unwrap();
///
/// assert_eq!(roster.len(), 4);
/// assert!(roster.get(roster.find_by_name("bo").unwrap()).unwrap().is_human);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    names: Vec<String>,
    size: Option<usize>,
    human: Option<String>,
}

impl RosterBuilder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            size: None,
            human: None,
        }
    }

    /// Target roster size; missing names are filled from [`DEFAULT_NAMES`]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_human(mut self, name: impl Into<String>) -> Self {
        self.human = Some(name.into());
        self
    }

    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Roster, DomainError> {
        let size = self.size.unwrap_or(self.names.len());
        let mut names: Vec<String> = self.names.into_iter().take(size).collect();

        for fallback in DEFAULT_NAMES {
            if names.len() >= size {
                break;
            }
            if !names.iter().any(|n| n.eq_ignore_ascii_case(fallback)) {
                names.push(fallback.to_string());
            }
        }

        if names.len() < MIN_ROSTER {
            return Err(DomainError::RosterTooSmall {
                min: MIN_ROSTER,
                actual: names.len(),
            });
        }
        if size > MAX_ROSTER {
            return Err(DomainError::RosterTooLarge {
                max: MAX_ROSTER,
                actual: size,
            });
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.to_lowercase()) {
                return Err(DomainError::DuplicateName(name.clone()));
            }
        }

        let competitors = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let archetype = Archetype::random(rng);
                let rating = 0.5 + archetype.comp_bias(rng) + rng.gen_range(-0.15..0.15);
                let is_human = self
                    .human
                    .as_deref()
                    .is_some_and(|h| h.eq_ignore_ascii_case(&name));
                Competitor::new(CompetitorId(idx as u32 + 1), name, archetype)
                    .with_human(is_human)
                    .with_personality(Personality::random(rng))
                    .with_skill(rng.gen_range(0.2..0.9))
                    .with_comp_rating(rating)
            })
            .collect();

        Ok(Roster::new(competitors))
    }
}
