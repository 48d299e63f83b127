//! Veto meeting: use or decline, then the replacement nominee.

use super::types::Step;
use super::{HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonCommand};
use crate::ports::human_player::HumanRequest;
use crate::ports::presentation::{Announcement, Tone};
use house_domain::eviction::{ai_veto_choice, apply_veto, place_replacement};
use house_domain::nomination::{ai_replacement, replacement_pool};
use house_domain::{CompetitorId, Phase};
use serde_json::json;
use tracing::{debug, info};

impl RunSeasonUseCase {
    pub(super) async fn run_veto_decision(&mut self) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        let Some(holder) = self.state.veto_holder else {
            info!("No veto holder this round");
            self.settle(ticket);
            return Ok(Phase::Eviction);
        };

        self.narrate(
            Announcement::new("Veto Meeting")
                .line(format!("{} holds the veto.", self.name(holder)))
                .line(format!("On the block: {}", self.names(&self.state.nominees))),
        )
        .await;
        self.open_window();

        let choice = if self.roster.is_human(holder) {
            self.ask_human(
                holder,
                HumanRequest::UseVeto {
                    nominees: self.state.nominees.clone(),
                },
            );
            let choice = self.await_veto_decision(holder).await?;
            self.human.on_turn_closed(ticket);
            choice
        } else {
            ai_veto_choice(holder, &self.state, &self.graph)
        };

        // A used veto needs somebody to take the empty seat
        let saved_and_pool = choice
            .map(|saved| (saved, replacement_pool(&self.state, &self.roster, saved)))
            .filter(|(_, pool)| !pool.is_empty());

        let Some((saved, pool)) = saved_and_pool else {
            if choice.is_some() {
                info!("No replacement available, the veto stays unused");
            }
            if self.settle(ticket) {
                self.narrate(
                    Announcement::new("The veto is not used")
                        .line(format!("{} keeps the nominations the same.", self.name(holder))),
                )
                .await;
            }
            return Ok(Phase::Eviction);
        };

        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Veto not applied: {}", rejection);
            return Ok(Phase::Eviction);
        }
        apply_veto(holder, saved, &mut self.state, &mut self.roster, &mut self.graph);
        self.round.veto_used_on = Some(saved);
        self.narrate(
            Announcement::new("The veto is used")
                .line(format!("{} comes off the block.", self.name(saved)))
                .tone(Tone::Good)
                .emphasized(),
        )
        .await;

        let replacement = self.choose_replacement(&pool).await?;
        place_replacement(replacement, &mut self.state, &mut self.roster, &mut self.graph);
        self.round.replacement = Some(replacement);
        self.log(
            "veto_used",
            json!({ "holder": holder, "saved": saved, "replacement": replacement }),
        );
        self.commit(ticket);

        self.narrate(
            Announcement::new("Replacement Nominee")
                .line(self.name(replacement))
                .tone(Tone::Bad)
                .emphasized(),
        )
        .await;
        Ok(Phase::Eviction)
    }

    /// Replacement named by the power-holder. `pool` is never empty here.
    async fn choose_replacement(
        &mut self,
        pool: &[CompetitorId],
    ) -> Result<CompetitorId, RunSeasonError> {
        let power = self.state.power_holder;
        let mut picked = None;
        if let Some(power) = power
            && self.roster.is_human(power)
        {
            self.open_window();
            self.ask_human(
                power,
                HumanRequest::NameReplacement {
                    pool: pool.to_vec(),
                },
            );
            picked = self.await_replacement(power, pool).await?;
            self.human.on_turn_closed(self.state.ticket());
        }
        let picked = picked
            .or_else(|| power.and_then(|p| ai_replacement(p, pool, &self.roster, &self.graph)))
            .unwrap_or(pool[0]);
        Ok(picked)
    }

    async fn await_veto_decision(
        &mut self,
        holder: CompetitorId,
    ) -> Result<Option<CompetitorId>, RunSeasonError> {
        loop {
            match self.next_step().await? {
                Step::Command(SeasonCommand::DecideVeto {
                    holder: actor,
                    save,
                    reply,
                    ..
                }) => {
                    let result = if actor != holder {
                        Err(HumanActionError::NotYourTurn(actor))
                    } else {
                        match save {
                            Some(id) if !self.state.is_nominee(id) => {
                                Err(HumanActionError::InvalidChoice(id))
                            }
                            _ => Ok(()),
                        }
                    };
                    let accepted = result.is_ok();
                    let _ = reply.send(result);
                    if accepted {
                        return Ok(save);
                    }
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => {
                    info!("No veto decision from {}, the veto goes unused", self.name(holder));
                    return Ok(None);
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
    }

    async fn await_replacement(
        &mut self,
        power: CompetitorId,
        pool: &[CompetitorId],
    ) -> Result<Option<CompetitorId>, RunSeasonError> {
        loop {
            match self.next_step().await? {
                Step::Command(SeasonCommand::NameReplacement {
                    holder,
                    replacement,
                    reply,
                    ..
                }) => {
                    let result = if holder != power {
                        Err(HumanActionError::NotYourTurn(holder))
                    } else if !pool.contains(&replacement) {
                        Err(HumanActionError::InvalidChoice(replacement))
                    } else {
                        Ok(())
                    };
                    let accepted = result.is_ok();
                    let _ = reply.send(result);
                    if accepted {
                        return Ok(Some(replacement));
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
}
