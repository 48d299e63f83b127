//! Power, veto and final competitions.

use super::types::{Deferred, DeferredEvent, Step};
use super::{HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonCommand};
use crate::ports::human_player::HumanRequest;
use crate::ports::presentation::{Announcement, Tone};
use crate::ports::score_provider::ScoreRequest;
use house_domain::competition::{apply_win, eligible_for};
use house_domain::{
    CompetitionKind, CompetitionOutcome, CompetitionResolver, CompetitorId, Phase, PhaseTicket,
};
use rand::Rng;
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// AI competitors finish somewhere in this fraction of the window
const AI_FINISH_MIN: f64 = 0.15;
const AI_FINISH_MAX: f64 = 0.85;

impl RunSeasonUseCase {
    pub(super) async fn run_competition(
        &mut self,
        kind: CompetitionKind,
    ) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        if kind == CompetitionKind::Power {
            self.start_round();
            self.announce_twist_week().await;
        }

        if kind == CompetitionKind::Veto {
            self.state.veto_players.clear();
        }
        let eligible = eligible_for(
            kind,
            &self.state,
            &self.roster,
            self.params.veto_players,
            &mut *self.rng,
        );
        if kind == CompetitionKind::Veto {
            self.state.veto_players = eligible.clone();
        }

        let resolver = CompetitionResolver::new(kind, eligible);
        resolver.begin(&mut self.state);

        self.narrate(
            Announcement::new(kind_title(kind))
                .line(format!("Playing: {}", self.names(resolver.eligible())))
                .tone(Tone::Dramatic),
        )
        .await;
        self.open_window();
        self.schedule_scores(&resolver, ticket);

        while !resolver.is_complete(&self.state) {
            match self.next_step().await? {
                Step::Command(SeasonCommand::SubmitScore {
                    competitor,
                    raw,
                    reply,
                    ..
                }) => {
                    let result = self.accept_score(&resolver, competitor, raw);
                    let _ = reply.send(result);
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) => {
                    debug!("Competition force-resolved");
                    break;
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(Deferred {
                    event: DeferredEvent::Score { competitor, seed },
                    ..
                }) => self.play_ai_score(&resolver, competitor, seed).await,
                Step::Deadline => {
                    info!(
                        "Time is up: {} still without a score",
                        resolver.missing(&self.state).len()
                    );
                    break;
                }
            }
        }
        self.human.on_turn_closed(ticket);
        self.deferred.clear();

        match self.finalize_competition(&resolver, ticket) {
            Some(outcome) => self.announce_winner(&outcome).await,
            None => warn!("{} competition had nobody to resolve", kind),
        }

        Ok(match kind {
            CompetitionKind::Power => Phase::Nomination,
            CompetitionKind::Veto => Phase::VetoDecision,
            CompetitionKind::FinalPart1 => Phase::FinalComp2,
            CompetitionKind::FinalPart2 => Phase::FinalComp3,
            CompetitionKind::FinalPart3 => Phase::FinalDecision,
        })
    }

    /// Queue AI finishes inside the window and ask humans to play.
    fn schedule_scores(&mut self, resolver: &CompetitionResolver, ticket: PhaseTicket) {
        let window = self.deadline.saturating_duration_since(Instant::now());
        for id in resolver.eligible() {
            if self.roster.is_human(*id) {
                self.ask_human(
                    *id,
                    HumanRequest::Compete {
                        kind: resolver.kind(),
                    },
                );
                continue;
            }
            let delay = window.mul_f64(self.rng.gen_range(AI_FINISH_MIN..AI_FINISH_MAX));
            let seed = self.rng.next_u64();
            self.deferred.insert(
                Deferred {
                    ticket,
                    event: DeferredEvent::Score {
                        competitor: *id,
                        seed,
                    },
                },
                delay,
            );
        }
    }

    /// Human score from the handle. AI entrants cannot be played through it.
    pub(super) fn accept_score(
        &mut self,
        resolver: &CompetitionResolver,
        competitor: CompetitorId,
        raw: f64,
    ) -> Result<(), HumanActionError> {
        if !self.roster.is_human(competitor) {
            return Err(HumanActionError::NotYourTurn(competitor));
        }
        let rating = self
            .roster
            .get(competitor)
            .map(|c| c.comp_rating)
            .unwrap_or_default();
        resolver.submit(&mut self.state, competitor, raw, rating)?;
        Ok(())
    }

    async fn play_ai_score(
        &mut self,
        resolver: &CompetitionResolver,
        competitor: CompetitorId,
        seed: u64,
    ) {
        let (request, rating) = match self.roster.get(competitor) {
            Some(c) => (
                ScoreRequest {
                    competitor,
                    kind: resolver.kind(),
                    skill: c.skill,
                    seed,
                },
                c.comp_rating,
            ),
            None => return,
        };

        match self.score_provider.raw_score(&request).await {
            Some(raw) => {
                if let Err(rejection) = resolver.submit(&mut self.state, competitor, raw, rating) {
                    debug!("AI score refused: {}", rejection);
                }
            }
            None => debug!("No score for {}, the default will apply", competitor),
        }
    }

    /// Resolve the competition once for `ticket` and apply the win.
    ///
    /// Returns `None` when the instance is stale or already resolved.
    pub(super) fn finalize_competition(
        &mut self,
        resolver: &CompetitionResolver,
        ticket: PhaseTicket,
    ) -> Option<CompetitionOutcome> {
        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Competition not resolved: {}", rejection);
            return None;
        }

        let outcome = resolver.resolve(&mut self.state, &mut *self.rng);
        if let Some(outcome) = &outcome {
            apply_win(outcome, &mut self.state, &mut self.roster);
            match outcome.kind {
                CompetitionKind::Power => self.round.power_holder = Some(outcome.winner),
                CompetitionKind::Veto => self.round.veto_holder = Some(outcome.winner),
                _ => {}
            }
            let standings: Vec<_> = outcome
                .standings
                .iter()
                .map(|(id, score)| json!({ "id": id, "score": score }))
                .collect();
            self.log(
                "competition_won",
                json!({
                    "kind": outcome.kind.as_str(),
                    "winner": outcome.winner,
                    "standings": standings,
                    "defaulted": outcome.defaulted,
                }),
            );
        }
        self.commit(ticket);
        outcome
    }

    async fn announce_winner(&mut self, outcome: &CompetitionOutcome) {
        let mut announcement = Announcement::new(format!(
            "{} wins {}",
            self.name(outcome.winner),
            kind_title(outcome.kind)
        ))
        .tone(Tone::Good)
        .emphasized();
        for (place, (id, score)) in outcome.standings.iter().take(3).enumerate() {
            announcement = announcement.line(format!("{}. {} ({:.1})", place + 1, self.name(*id), score));
        }
        if !outcome.defaulted.is_empty() {
            announcement = announcement.line(format!(
                "No result from {}, default scores applied",
                self.names(&outcome.defaulted)
            ));
        }
        self.narrate(announcement).await;
    }
}

fn kind_title(kind: CompetitionKind) -> &'static str {
    match kind {
        CompetitionKind::Power => "the Power Competition",
        CompetitionKind::Veto => "the Veto Competition",
        CompetitionKind::FinalPart1 => "Final Competition, Part 1",
        CompetitionKind::FinalPart2 => "Final Competition, Part 2",
        CompetitionKind::FinalPart3 => "Final Competition, Part 3",
    }
}
