//! Final decision, jury vote and the finale.

use super::types::Step;
use super::{HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonCommand};
use crate::ports::human_player::HumanRequest;
use crate::ports::presentation::{Announcement, Tone};
use crate::ports::tie_break::TieBreakRequest;
use house_domain::eviction::{ai_final_decision, seat_evictee};
use house_domain::jury::{ai_ballot, shuffled_jurors, tie_break_bias, weighted_draw};
use house_domain::{
    Ballot, BallotBox, BallotError, CompetitorId, JuryTally, JuryVerdict, Phase, SeasonResult,
    TallyOutcome, WeekRecord,
};
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::{debug, info, warn};

impl RunSeasonUseCase {
    pub(super) async fn run_final_decision(&mut self) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        let holder = self.state.power_holder;
        let candidates: Vec<CompetitorId> = self
            .roster
            .living_ids()
            .into_iter()
            .filter(|id| Some(*id) != holder)
            .collect();

        let Some(holder) = holder.filter(|_| candidates.len() >= 2) else {
            warn!("No final decision to make, everyone left goes to the jury vote");
            self.state.finalists = self.roster.living_ids();
            self.settle(ticket);
            return Ok(Phase::JuryVote);
        };

        self.narrate(
            Announcement::new("The Final Decision")
                .line(format!(
                    "{} chooses who to take to the final two: {}",
                    self.name(holder),
                    self.names(&candidates)
                ))
                .tone(Tone::Dramatic),
        )
        .await;
        self.open_window();

        let mut cut = None;
        if self.roster.is_human(holder) {
            self.ask_human(
                holder,
                HumanRequest::FinalDecision {
                    candidates: candidates.clone(),
                },
            );
            cut = self.await_final_choice(holder, &candidates).await?;
            self.human.on_turn_closed(ticket);
        }
        let cut = cut.or_else(|| ai_final_decision(holder, &candidates, &self.roster, &self.graph));

        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Final decision not applied: {}", rejection);
            return Ok(Phase::JuryVote);
        }

        let mut record = WeekRecord::new(self.state.week);
        record.power_holder = Some(holder);
        if let Some(cut) = cut {
            // Whoever is cut at the end always sits on the jury
            seat_evictee(cut, 0, self.params.jury_size, &mut self.state, &mut self.roster);
            record.evicted = Some(cut);
            self.log("final_decision", json!({ "holder": holder, "evicted": cut }));
        }
        self.state.finalists = self.roster.living_ids();
        self.commit(ticket);
        self.progress.on_round_complete(&record);
        self.weeks.push(record);

        if let Some(cut) = cut {
            self.narrate(
                Announcement::new(format!("{} has been evicted", self.name(cut)))
                    .line(format!("Final two: {}", self.names(&self.state.finalists)))
                    .tone(Tone::Bad)
                    .emphasized(),
            )
            .await;
        }
        Ok(Phase::JuryVote)
    }

    async fn await_final_choice(
        &mut self,
        holder: CompetitorId,
        candidates: &[CompetitorId],
    ) -> Result<Option<CompetitorId>, RunSeasonError> {
        loop {
            match self.next_step().await? {
                Step::Command(SeasonCommand::ChooseFinalist {
                    holder: actor,
                    evict,
                    reply,
                    ..
                }) => {
                    let result = if actor != holder {
                        Err(HumanActionError::NotYourTurn(actor))
                    } else if !candidates.contains(&evict) {
                        Err(HumanActionError::InvalidChoice(evict))
                    } else {
                        Ok(())
                    };
                    let accepted = result.is_ok();
                    let _ = reply.send(result);
                    if accepted {
                        return Ok(Some(evict));
                    }
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => {
                    info!("No final decision from {}, deciding for them", self.name(holder));
                    return Ok(None);
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
    }

    pub(super) async fn run_jury_vote(&mut self) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        let finalists = self.roster.living_ids();
        self.state.finalists = finalists.clone();

        let (first, second) = match finalists.as_slice() {
            [first, second, ..] => (*first, *second),
            [only] => {
                warn!("A single finalist remains and wins by default");
                let tally = JuryTally::new(finalists.clone(), 0);
                self.verdict = Some(JuryVerdict::from_tally(&tally, Vec::new(), *only, None, false));
                self.settle(ticket);
                return Ok(Phase::Finale);
            }
            [] => {
                warn!("No finalists left");
                self.settle(ticket);
                return Ok(Phase::Finale);
            }
        };

        let jurors = shuffled_jurors(&self.state.jury, &mut *self.rng);
        self.narrate(
            Announcement::new("The Jury Votes")
                .line(format!(
                    "{} jurors decide between {} and {}.",
                    jurors.len(),
                    self.name(first),
                    self.name(second)
                ))
                .tone(Tone::Dramatic),
        )
        .await;
        self.open_window();

        let mut ballots = BallotBox::new(vec![first, second], jurors.clone());
        let humans: Vec<CompetitorId> = jurors
            .iter()
            .copied()
            .filter(|id| self.roster.is_human(*id))
            .collect();
        if !humans.is_empty() {
            for juror in &humans {
                self.ask_human(
                    *juror,
                    HumanRequest::JuryBallot {
                        finalists: vec![first, second],
                    },
                );
            }
            self.collect_jury_ballots(&humans, &mut ballots).await?;
            self.human.on_turn_closed(ticket);
        }

        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Jury vote not resolved: {}", rejection);
            return Ok(Phase::Finale);
        }

        if jurors.is_empty() {
            let winner = [first, second].choose(&mut *self.rng).copied().unwrap_or(first);
            let runner_up = if winner == first { second } else { first };
            let tally = JuryTally::new(vec![first, second], 0);
            self.verdict = Some(JuryVerdict::from_tally(
                &tally,
                Vec::new(),
                winner,
                Some(runner_up),
                false,
            ));
            self.commit(ticket);
            self.narrate(
                Announcement::new("There is no jury")
                    .line("Fate picks the winner.")
                    .tone(Tone::Dramatic),
            )
            .await;
            return Ok(Phase::Finale);
        }

        for juror in &jurors {
            if !ballots.has_voted(*juror) {
                let pick = ai_ballot(*juror, first, second, &self.roster, &self.graph);
                if let Err(e) = ballots.cast(Ballot::new(*juror, pick)) {
                    debug!("AI ballot refused: {}", e);
                }
            }
        }

        let mut tally = JuryTally::new(vec![first, second], jurors.len());
        for juror in &jurors {
            let Some(finalist) = ballots
                .ballots()
                .iter()
                .find(|b| b.juror == *juror)
                .map(|b| b.finalist)
            else {
                continue;
            };
            let clinched = tally.record(finalist);
            self.log("jury_ballot", json!({ "juror": juror, "finalist": finalist }));
            self.narrate(
                Announcement::new(format!("{} votes", self.name(*juror)))
                    .line(format!("for {} to win.", self.name(finalist)))
                    .line(tally.summary()),
            )
            .await;
            if let Some(winner) = clinched {
                self.log("majority_clinched", json!({ "winner": winner }));
                self.narrate(
                    Announcement::new(format!("{} has clinched the majority", self.name(winner)))
                        .tone(Tone::Good)
                        .emphasized(),
                )
                .await;
            }
        }

        let (winner, runner_up, tie_break_used) = match tally.outcome() {
            TallyOutcome::Decided { winner, runner_up } => (winner, runner_up, false),
            TallyOutcome::Tied => {
                let winner = self.break_jury_tie(first, second).await;
                let runner_up = if winner == first { second } else { first };
                (winner, runner_up, true)
            }
        };

        let verdict = JuryVerdict::from_tally(
            &tally,
            ballots.ballots().to_vec(),
            winner,
            Some(runner_up),
            tie_break_used,
        );
        info!("{}", verdict.score_line(&self.roster));
        self.verdict = Some(verdict);
        self.commit(ticket);
        Ok(Phase::Finale)
    }

    async fn collect_jury_ballots(
        &mut self,
        humans: &[CompetitorId],
        ballots: &mut BallotBox,
    ) -> Result<(), RunSeasonError> {
        while humans.iter().any(|id| !ballots.has_voted(*id)) {
            match self.next_step().await? {
                Step::Command(SeasonCommand::CastJuryBallot {
                    juror,
                    finalist,
                    reply,
                    ..
                }) => {
                    let result = if !humans.contains(&juror) {
                        Err(HumanActionError::NotYourTurn(juror))
                    } else {
                        ballots
                            .cast(Ballot::new(juror, finalist))
                            .map_err(|e| match e {
                                BallotError::NotAJuror(id) => HumanActionError::NotYourTurn(id),
                                BallotError::NotAFinalist(id) => HumanActionError::InvalidChoice(id),
                                BallotError::AlreadyCast(id) => HumanActionError::AlreadyCast(id),
                            })
                    };
                    let _ = reply.send(result);
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => {
                    info!("Jury voting closed, absent jurors vote on instinct");
                    break;
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
        Ok(())
    }

    /// Ask the tie-break provider once; fall back to a weighted draw.
    async fn break_jury_tie(&mut self, first: CompetitorId, second: CompetitorId) -> CompetitorId {
        let bias = tie_break_bias(first, second, &self.roster);
        self.narrate(
            Announcement::new("The jury is deadlocked")
                .line("An outside vote will break the tie.")
                .tone(Tone::Dramatic),
        )
        .await;

        let request = TieBreakRequest {
            finalists: [first, second],
            bias_toward_first: bias,
        };
        let winner = match self.tie_break.break_tie(&request).await {
            Some(id) if id == first || id == second => id,
            answer => {
                if let Some(id) = answer {
                    warn!("Tie-break named {}, who is not a finalist", id);
                }
                weighted_draw(first, second, bias, &mut *self.rng)
            }
        };
        self.log(
            "jury_tie_break",
            json!({ "finalists": [first, second], "bias": bias, "winner": winner }),
        );
        winner
    }

    /// Announce the winner and assemble the season result.
    pub(super) async fn run_finale(mut self) -> SeasonResult {
        let verdict = match self.verdict.take() {
            Some(verdict) => verdict,
            None => self.fallback_verdict(),
        };

        self.narrate(
            Announcement::new(format!("{} wins the season!", self.name(verdict.winner)))
                .line(verdict.score_line(&self.roster))
                .tone(Tone::Good)
                .emphasized(),
        )
        .await;

        let result = SeasonResult {
            winner: verdict.winner,
            runner_up: verdict.runner_up,
            jury_votes: verdict.votes.clone(),
            tie_break_used: verdict.tie_break_used,
            weeks: std::mem::take(&mut self.weeks),
            jury: self.state.jury.clone(),
            returned: self.returned,
            seed: self.params.seed,
        };
        self.log(
            "season_complete",
            json!({
                "winner": result.winner,
                "runner_up": result.runner_up,
                "votes": verdict.votes,
                "tie_break_used": result.tie_break_used,
            }),
        );
        self.progress.on_phase_complete(&Phase::Finale);
        self.progress.on_season_complete(&result);
        info!("Season complete: {} wins", self.name(result.winner));
        result
    }

    /// Winner when the jury vote never produced a verdict
    fn fallback_verdict(&mut self) -> JuryVerdict {
        let living = self.roster.living_ids();
        let winner = living
            .choose(&mut *self.rng)
            .copied()
            .or_else(|| self.roster.all().first().map(|c| c.id))
            .unwrap_or(CompetitorId(0));
        warn!("No jury verdict recorded, {} takes the season", winner);
        let tally = JuryTally::new(living, 0);
        JuryVerdict::from_tally(&tally, Vec::new(), winner, None, false)
    }
}
