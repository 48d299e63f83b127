//! Who may play each competition

use crate::competition::kind::CompetitionKind;
use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::season::state::GameState;
use rand::Rng;
use rand::seq::SliceRandom;

/// Living count at which the outgoing holder may play again
const OPEN_POWER_AT: usize = 4;

pub const DEFAULT_VETO_PLAYERS: usize = 6;

/// Living competitors minus the outgoing power-holder.
///
/// The holder is excluded except in week 1 and when exactly four remain.
pub fn power_competition_eligible(state: &GameState, roster: &Roster) -> Vec<CompetitorId> {
    let living = roster.living_ids();
    if state.week == 1 || living.len() == OPEN_POWER_AT {
        return living;
    }
    match state.power_holder {
        Some(outgoing) => living.into_iter().filter(|id| *id != outgoing).collect(),
        None => living,
    }
}

/// Power-holder and nominees first, then random others up to `max_players`.
pub fn veto_players<R: Rng + ?Sized>(
    state: &GameState,
    roster: &Roster,
    max_players: usize,
    rng: &mut R,
) -> Vec<CompetitorId> {
    let mut players: Vec<CompetitorId> = Vec::new();
    let fixed = state.power_holder.into_iter().chain(state.nominees.iter().copied());
    for id in fixed {
        if roster.is_living(id) && !players.contains(&id) {
            players.push(id);
        }
    }

    let mut others: Vec<CompetitorId> = roster
        .living_ids()
        .into_iter()
        .filter(|id| !players.contains(id))
        .collect();
    others.shuffle(rng);

    let open = max_players.saturating_sub(players.len());
    players.extend(others.into_iter().take(open));
    players
}

/// Entrants of a part of the final competition.
///
/// Part 1 is everyone left, part 2 the two who lost part 1, part 3 the
/// winners of the first two parts.
pub fn final_part_eligible(
    kind: CompetitionKind,
    state: &GameState,
    roster: &Roster,
) -> Vec<CompetitorId> {
    let living = roster.living_ids();
    match kind {
        CompetitionKind::FinalPart2 => living
            .into_iter()
            .filter(|id| Some(*id) != state.final_part1_winner)
            .collect(),
        CompetitionKind::FinalPart3 => {
            let winners: Vec<CompetitorId> = [state.final_part1_winner, state.final_part2_winner]
                .into_iter()
                .flatten()
                .filter(|id| roster.is_living(*id))
                .collect();
            if winners.len() == 2 { winners } else { living }
        }
        _ => living,
    }
}

/// Eligible set for any competition kind
pub fn eligible_for<R: Rng + ?Sized>(
    kind: CompetitionKind,
    state: &GameState,
    roster: &Roster,
    veto_max: usize,
    rng: &mut R,
) -> Vec<CompetitorId> {
    match kind {
        CompetitionKind::Power => power_competition_eligible(state, roster),
        CompetitionKind::Veto => veto_players(state, roster, veto_max, rng),
        _ => final_part_eligible(kind, state, roster),
    }
}
