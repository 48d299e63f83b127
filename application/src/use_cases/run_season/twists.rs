//! Multi-eviction weeks and the jury return.

use super::types::Step;
use super::{HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonCommand};
use crate::ports::human_player::HumanRequest;
use crate::ports::presentation::{Announcement, Tone};
use house_domain::eviction::{ai_return_vote, reinstate, returning_juror};
use house_domain::{CompetitorId, Phase};
use serde_json::json;
use tracing::{debug, info};

impl RunSeasonUseCase {
    /// Announce a double or triple eviction at the start of its first round.
    pub(super) async fn announce_twist_week(&mut self) {
        let scheduled = self.params.twists.evictions_in_week(self.state.week);
        if scheduled < 2 || self.state.evictions_remaining != scheduled {
            return;
        }
        let label = if scheduled == 3 { "Triple" } else { "Double" };
        info!("{} eviction week {}", label, self.state.week);
        self.log(
            "twist_week",
            json!({ "week": self.state.week, "evictions": scheduled }),
        );
        self.narrate(
            Announcement::new(format!("{} Eviction Week", label))
                .line(format!("{} houseguests will leave this week.", scheduled))
                .line("Later rounds run on a shorter clock.")
                .tone(Tone::Dramatic)
                .emphasized(),
        )
        .await;
    }

    pub(super) async fn run_jury_return(&mut self) -> Phase {
        let jury = self.state.jury.clone();
        self.narrate(
            Announcement::new("Jury Return")
                .line("One juror will re-enter the house.")
                .line(format!("Jurors: {}", self.names(&jury)))
                .tone(Tone::Dramatic)
                .emphasized(),
        )
        .await;
        Phase::JuryReturnVote
    }

    pub(super) async fn run_jury_return_vote(&mut self) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        let jury = self.state.jury.clone();
        let voters = self.roster.living_ids();
        self.open_window();

        let mut votes: Vec<(CompetitorId, CompetitorId)> = Vec::new();
        let humans: Vec<CompetitorId> = voters
            .iter()
            .copied()
            .filter(|id| self.roster.is_human(*id))
            .collect();
        if !humans.is_empty() {
            for voter in &humans {
                self.ask_human(
                    *voter,
                    HumanRequest::ReturnVote {
                        jurors: jury.clone(),
                    },
                );
            }
            self.collect_return_votes(&humans, &jury, &mut votes).await?;
            self.human.on_turn_closed(ticket);
        }

        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Jury return not resolved: {}", rejection);
            return Ok(Phase::PowerCompetition);
        }

        for voter in &voters {
            if votes.iter().any(|(v, _)| v == voter) {
                continue;
            }
            if let Some(juror) = ai_return_vote(*voter, &jury, &self.graph) {
                votes.push((*voter, juror));
            }
        }

        let returning = returning_juror(&votes, &jury, &mut *self.rng);
        if let Some(juror) = returning {
            reinstate(juror, &mut self.state, &mut self.roster);
            self.returned = Some(juror);
            self.log("jury_return", json!({ "returned": juror, "votes": votes }));
        }
        self.commit(ticket);

        if let Some(juror) = returning {
            self.narrate(
                Announcement::new(format!("{} is back in the game", self.name(juror)))
                    .tone(Tone::Good)
                    .emphasized(),
            )
            .await;
        }

        if self.state.evictions_remaining == 0 {
            self.advance_week();
        }
        Ok(Phase::PowerCompetition)
    }

    async fn collect_return_votes(
        &mut self,
        humans: &[CompetitorId],
        jury: &[CompetitorId],
        votes: &mut Vec<(CompetitorId, CompetitorId)>,
    ) -> Result<(), RunSeasonError> {
        let voted = |votes: &[(CompetitorId, CompetitorId)], id: CompetitorId| {
            votes.iter().any(|(v, _)| *v == id)
        };
        while humans.iter().any(|id| !voted(votes.as_slice(), *id)) {
            match self.next_step().await? {
                Step::Command(SeasonCommand::CastReturnVote {
                    voter,
                    juror,
                    reply,
                    ..
                }) => {
                    let result = if !humans.contains(&voter) {
                        Err(HumanActionError::NotYourTurn(voter))
                    } else if voted(votes.as_slice(), voter) {
                        Err(HumanActionError::AlreadyCast(voter))
                    } else if !jury.contains(&juror) {
                        Err(HumanActionError::InvalidChoice(juror))
                    } else {
                        votes.push((voter, juror));
                        Ok(())
                    };
                    let _ = reply.send(result);
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => break,
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
        Ok(())
    }
}
