//! Eviction vote, tie-break by the power-holder and jury seating.

use super::types::Step;
use super::{HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonCommand};
use crate::ports::human_player::HumanRequest;
use crate::ports::presentation::{Announcement, Tone};
use house_domain::eviction::{
    ai_eviction_vote, eviction_voters, seat_evictee, should_trigger,
};
use house_domain::{CompetitorId, EvictionCount, EvictionTally, Phase, Seat};
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::{debug, info, warn};

impl RunSeasonUseCase {
    pub(super) async fn run_eviction(&mut self) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        let nominees = self.state.nominees.clone();
        let voters = eviction_voters(&self.state, &self.roster);

        self.narrate(
            Announcement::new("Live Eviction")
                .line(format!("On the block: {}", self.names(&nominees)))
                .line(format!("{} houseguests will vote.", voters.len()))
                .tone(Tone::Dramatic),
        )
        .await;
        self.open_window();

        let mut tally = EvictionTally::new();
        let humans: Vec<CompetitorId> = voters
            .iter()
            .copied()
            .filter(|id| self.roster.is_human(*id))
            .collect();
        if !humans.is_empty() {
            for voter in &humans {
                self.ask_human(
                    *voter,
                    HumanRequest::EvictionVote {
                        nominees: nominees.clone(),
                    },
                );
            }
            self.collect_eviction_votes(&humans, &nominees, &mut tally)
                .await?;
            self.human.on_turn_closed(ticket);
        }

        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Eviction not resolved: {}", rejection);
            return Ok(self.after_eviction());
        }

        for voter in &voters {
            if tally.has_voted(*voter) {
                continue;
            }
            if let Some(target) = ai_eviction_vote(*voter, &nominees, &self.roster, &self.graph) {
                tally.cast(*voter, target);
            }
        }

        let evictee = match nominees.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => match tally.count(&nominees) {
                EvictionCount::Evict(id) => Some(id),
                EvictionCount::Tie(tied) => self.holder_breaks_tie(&tied).await?,
                EvictionCount::NoVotes => self.holder_breaks_tie(&nominees).await?,
            },
        };

        let Some(evictee) = evictee else {
            warn!("Nobody on the block, no eviction this round");
            self.commit(ticket);
            self.finish_round();
            return Ok(self.after_eviction());
        };

        for bloc in tally.blocs() {
            if bloc.len() >= 2 {
                self.graph.apply_shared_vote(&bloc);
            }
        }

        let living_before = self.roster.living_count();
        let seat = seat_evictee(
            evictee,
            living_before,
            self.params.jury_size,
            &mut self.state,
            &mut self.roster,
        );
        self.state.evictions_remaining = self.state.evictions_remaining.saturating_sub(1);

        let counts = tally.counts(&nominees);
        self.round.evicted = Some(evictee);
        self.round.vote_counts = counts.clone();
        self.log(
            "eviction",
            json!({
                "week": self.state.week,
                "evicted": evictee,
                "seat": seat,
                "votes": tally.votes(),
            }),
        );
        self.commit(ticket);

        let line = nominees
            .iter()
            .map(|id| format!("{} {}", self.name(*id), counts.get(id).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" / ");
        let destination = match seat {
            Seat::Jury => "joins the jury",
            Seat::JuryHouse => "heads to the jury house",
        };
        self.narrate(
            Announcement::new(format!("{} has been evicted", self.name(evictee)))
                .line(line)
                .line(format!("{} {}.", self.name(evictee), destination))
                .tone(Tone::Bad)
                .emphasized(),
        )
        .await;

        self.finish_round();
        Ok(self.after_eviction())
    }

    async fn collect_eviction_votes(
        &mut self,
        humans: &[CompetitorId],
        nominees: &[CompetitorId],
        tally: &mut EvictionTally,
    ) -> Result<(), RunSeasonError> {
        while humans.iter().any(|id| !tally.has_voted(*id)) {
            match self.next_step().await? {
                Step::Command(SeasonCommand::CastEvictionVote {
                    voter,
                    target,
                    reply,
                    ..
                }) => {
                    let result = if !humans.contains(&voter) {
                        Err(HumanActionError::NotYourTurn(voter))
                    } else if tally.has_voted(voter) {
                        Err(HumanActionError::AlreadyCast(voter))
                    } else if !nominees.contains(&target) {
                        Err(HumanActionError::InvalidChoice(target))
                    } else {
                        tally.cast(voter, target);
                        Ok(())
                    };
                    let _ = reply.send(result);
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => {
                    info!("Voting closed, remaining votes are cast for absent voters");
                    break;
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
        Ok(())
    }

    /// The power-holder picks among `tied`; a human holder answers with an
    /// eviction vote.
    async fn holder_breaks_tie(
        &mut self,
        tied: &[CompetitorId],
    ) -> Result<Option<CompetitorId>, RunSeasonError> {
        let holder = self.state.power_holder;
        self.narrate(
            Announcement::new("It's a tie")
                .line(format!("Tied: {}", self.names(tied)))
                .line(match holder {
                    Some(h) => format!("{} casts the deciding vote.", self.name(h)),
                    None => "The deciding vote falls to chance.".to_string(),
                })
                .tone(Tone::Dramatic),
        )
        .await;

        let mut decided = None;
        if let Some(h) = holder
            && self.roster.is_human(h)
        {
            self.open_window();
            self.ask_human(
                h,
                HumanRequest::BreakEvictionTie {
                    tied: tied.to_vec(),
                },
            );
            decided = self.await_tie_break(h, tied).await?;
            self.human.on_turn_closed(self.state.ticket());
        }

        let decided = decided
            .or_else(|| holder.and_then(|h| ai_eviction_vote(h, tied, &self.roster, &self.graph)))
            .or_else(|| tied.choose(&mut *self.rng).copied());
        if let Some(id) = decided {
            self.log("eviction_tie_break", json!({ "holder": holder, "evicted": id }));
        }
        Ok(decided)
    }

    async fn await_tie_break(
        &mut self,
        holder: CompetitorId,
        tied: &[CompetitorId],
    ) -> Result<Option<CompetitorId>, RunSeasonError> {
        loop {
            match self.next_step().await? {
                Step::Command(SeasonCommand::CastEvictionVote {
                    voter,
                    target,
                    reply,
                    ..
                }) => {
                    let result = if voter != holder {
                        Err(HumanActionError::NotYourTurn(voter))
                    } else if !tied.contains(&target) {
                        Err(HumanActionError::InvalidChoice(target))
                    } else {
                        Ok(())
                    };
                    let accepted = result.is_ok();
                    let _ = reply.send(result);
                    if accepted {
                        return Ok(Some(target));
                    }
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => {
                    return Ok(None);
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
    }

    /// Where the season goes after an eviction round.
    pub(super) fn after_eviction(&mut self) -> Phase {
        let living = self.roster.living_count();
        let twists = &self.params.twists;
        if should_trigger(&self.state, twists.jury_return, twists.jury_return_at, living) {
            return Phase::JuryReturn;
        }
        if living <= 2 {
            return Phase::JuryVote;
        }
        if living == 3 {
            return Phase::FinalComp1;
        }
        if self.state.evictions_remaining == 0 {
            self.advance_week();
        }
        Phase::PowerCompetition
    }
}
