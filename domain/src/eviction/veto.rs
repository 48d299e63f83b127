//! Veto meeting

use crate::core::competitor::CompetitorId;
use crate::core::roster::Roster;
use crate::relationship::RelationshipGraph;
use crate::season::state::GameState;
use std::cmp::Ordering;
use tracing::info;

/// Minimum affinity toward a nominee for the holder to use the veto on them
pub const SAVE_AFFINITY: f64 = 0.35;

/// Nominee an AI veto holder would save, if any.
///
/// A nominated holder always saves themself. Otherwise the holder saves the
/// nominee they like most, provided that affinity reaches [`SAVE_AFFINITY`]
/// or the two share an alliance.
pub fn ai_veto_choice(
    holder: CompetitorId,
    state: &GameState,
    graph: &RelationshipGraph,
) -> Option<CompetitorId> {
    if state.is_nominee(holder) {
        return Some(holder);
    }
    let mut ranked: Vec<(CompetitorId, f64)> = state
        .nominees
        .iter()
        .map(|id| (*id, graph.affinity(holder, *id)))
        .collect();
    ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    ranked
        .into_iter()
        .find(|(id, affinity)| *affinity >= SAVE_AFFINITY || graph.share_alliance(holder, *id))
        .map(|(id, _)| id)
}

/// Take `saved` off the block and reward the holder.
pub fn apply_veto(
    holder: CompetitorId,
    saved: CompetitorId,
    state: &mut GameState,
    roster: &mut Roster,
    graph: &mut RelationshipGraph,
) {
    state.nominees.retain(|id| *id != saved);
    if let Some(c) = roster.get_mut(saved) {
        c.nominated = false;
    }
    graph.apply_veto_save(holder, saved);
    info!(
        "{} used the veto on {}",
        roster.name_of(holder),
        roster.name_of(saved)
    );
}

/// Put the replacement nominee on the block.
pub fn place_replacement(
    replacement: CompetitorId,
    state: &mut GameState,
    roster: &mut Roster,
    graph: &mut RelationshipGraph,
) {
    state.nominees.push(replacement);
    if let Some(c) = roster.get_mut(replacement) {
        c.nominated = true;
        c.times_nominated += 1;
    }
    if let Some(holder) = state.power_holder {
        graph.apply_nomination_penalty(holder, replacement);
    }
    info!("{} named as replacement nominee", roster.name_of(replacement));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roster::RosterBuilder;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (Roster, RelationshipGraph, GameState) {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let roster = RosterBuilder::new(Vec::<String>::new())
            .with_size(7)
            .build(&mut rng)
            .unwrap();
        let mut state = GameState::new();
        state.power_holder = Some(CompetitorId(1));
        state.nominees = vec![CompetitorId(2), CompetitorId(3)];
        (roster, RelationshipGraph::new(), state)
    }

    #[test]
    fn test_nominated_holder_saves_self() {
        let (_, graph, state) = setup();
        assert_eq!(ai_veto_choice(CompetitorId(3), &state, &graph), Some(CompetitorId(3)));
    }

    #[test]
    fn test_holder_saves_friend() {
        let (_, mut graph, state) = setup();
        graph.set_affinity(CompetitorId(5), CompetitorId(2), 0.2);
        graph.set_affinity(CompetitorId(5), CompetitorId(3), 0.5);
        assert_eq!(ai_veto_choice(CompetitorId(5), &state, &graph), Some(CompetitorId(3)));
    }

    #[test]
    fn test_lukewarm_holder_keeps_nominations() {
        let (_, mut graph, state) = setup();
        graph.set_affinity(CompetitorId(5), CompetitorId(2), 0.3);
        assert_eq!(ai_veto_choice(CompetitorId(5), &state, &graph), None);
    }

    #[test]
    fn test_holder_saves_ally() {
        let (_, mut graph, state) = setup();
        let members = [CompetitorId(5), CompetitorId(2), CompetitorId(6)];
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                graph.set_bond(*a, *b, 50.0);
            }
        }
        graph.try_form(members.to_vec()).unwrap();
        assert_eq!(ai_veto_choice(CompetitorId(5), &state, &graph), Some(CompetitorId(2)));
    }

    #[test]
    fn test_veto_and_replacement() {
        let (mut roster, mut graph, mut state) = setup();
        roster.get_mut(CompetitorId(2)).unwrap().nominated = true;
        state.veto_holder = Some(CompetitorId(5));

        apply_veto(CompetitorId(5), CompetitorId(2), &mut state, &mut roster, &mut graph);
        assert_eq!(state.nominees, vec![CompetitorId(3)]);
        assert!(!roster.get(CompetitorId(2)).unwrap().nominated);
        assert_eq!(graph.bond(CompetitorId(5), CompetitorId(2)), 20.0);
        assert!(graph.affinity(CompetitorId(2), CompetitorId(5)) > 0.0);

        place_replacement(CompetitorId(4), &mut state, &mut roster, &mut graph);
        assert_eq!(state.nominees, vec![CompetitorId(3), CompetitorId(4)]);
        assert_eq!(roster.get(CompetitorId(4)).unwrap().times_nominated, 1);
        assert_eq!(graph.bond(CompetitorId(1), CompetitorId(4)), -15.0);
    }
}
