//! Game state (single source of truth for the scheduler)

use crate::core::competitor::CompetitorId;
use crate::season::commit::{CommitRejection, CommitState, PhaseCommit};
use crate::season::phase::{Phase, PhaseTicket};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable season state
///
/// Owned by the scheduler task; domain functions receive it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub week: u32,
    pub power_holder: Option<CompetitorId>,
    /// Holder of the previous round, ineligible for the next power competition
    pub last_power_holder: Option<CompetitorId>,
    pub nominees: Vec<CompetitorId>,
    pub veto_holder: Option<CompetitorId>,
    pub veto_players: Vec<CompetitorId>,
    pub jury: Vec<CompetitorId>,
    /// Evictees not seated on the jury
    pub jury_house: Vec<CompetitorId>,
    /// Scores of the running competition (cleared when one begins)
    pub scores: BTreeMap<CompetitorId, f64>,
    pub finalists: Vec<CompetitorId>,
    pub final_part1_winner: Option<CompetitorId>,
    pub final_part2_winner: Option<CompetitorId>,
    /// Evictions still to run this week, counting the current one
    pub evictions_remaining: u32,
    pub jury_return_used: bool,
    pub phase_instance: u64,
    commit: PhaseCommit,
}

impl GameState {
    pub fn new() -> Self {
        let ticket = PhaseTicket {
            phase: Phase::Lobby,
            instance: 0,
        };
        Self {
            phase: Phase::Lobby,
            week: 1,
            power_holder: None,
            last_power_holder: None,
            nominees: Vec::new(),
            veto_holder: None,
            veto_players: Vec::new(),
            jury: Vec::new(),
            jury_house: Vec::new(),
            scores: BTreeMap::new(),
            finalists: Vec::new(),
            final_part1_winner: None,
            final_part2_winner: None,
            evictions_remaining: 1,
            jury_return_used: false,
            phase_instance: 0,
            commit: PhaseCommit::pending(ticket),
        }
    }

    /// Move to `phase`, issuing a fresh ticket and a pending commit record.
    pub fn enter(&mut self, phase: Phase) -> PhaseTicket {
        self.phase_instance += 1;
        self.phase = phase;
        let ticket = self.ticket();
        self.commit = PhaseCommit::pending(ticket);
        ticket
    }

    pub fn ticket(&self) -> PhaseTicket {
        PhaseTicket {
            phase: self.phase,
            instance: self.phase_instance,
        }
    }

    pub fn is_current(&self, ticket: PhaseTicket) -> bool {
        ticket == self.ticket()
    }

    pub fn commit_state(&self) -> CommitState {
        self.commit.state
    }

    /// Claim the right to resolve the phase instance named by `ticket`.
    pub fn begin_resolve(&mut self, ticket: PhaseTicket) -> Result<(), CommitRejection> {
        self.commit.begin(ticket)
    }

    pub fn commit(&mut self, ticket: PhaseTicket) -> Result<(), CommitRejection> {
        self.commit.finish(ticket)
    }

    pub fn is_nominee(&self, id: CompetitorId) -> bool {
        self.nominees.contains(&id)
    }

    pub fn is_juror(&self, id: CompetitorId) -> bool {
        self.jury.contains(&id)
    }

    /// Reset the per-week fields at the start of a nomination round.
    pub fn clear_round(&mut self) {
        self.nominees.clear();
        self.veto_holder = None;
        self.veto_players.clear();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.phase, Phase::Lobby);
        assert_eq!(state.week, 1);
        assert_eq!(state.phase_instance, 0);
        assert!(state.jury.is_empty());
    }

    #[test]
    fn test_enter_issues_increasing_tickets() {
        let mut state = GameState::new();
        let first = state.enter(Phase::Opening);
        let second = state.enter(Phase::PowerCompetition);
        assert!(second.instance > first.instance);
        assert!(state.is_current(second));
        assert!(!state.is_current(first));
    }

    #[test]
    fn test_resolution_happens_once_per_instance() {
        let mut state = GameState::new();
        let ticket = state.enter(Phase::Nomination);

        assert!(state.begin_resolve(ticket).is_ok());
        assert!(state.commit(ticket).is_ok());
        assert_eq!(
            state.begin_resolve(ticket),
            Err(CommitRejection::AlreadyCommitted(ticket))
        );
    }

    #[test]
    fn test_reentering_same_phase_resets_commit() {
        let mut state = GameState::new();
        let first = state.enter(Phase::PowerCompetition);
        state.begin_resolve(first).unwrap();
        state.commit(first).unwrap();

        let second = state.enter(Phase::PowerCompetition);
        assert!(state.commit_state().is_pending());
        assert_eq!(state.begin_resolve(first), Err(CommitRejection::Stale(first)));
        assert!(state.begin_resolve(second).is_ok());
    }
}
