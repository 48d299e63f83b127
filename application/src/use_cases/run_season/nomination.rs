//! Nomination phase and ceremony.

use super::types::Step;
use super::{HumanActionError, RunSeasonError, RunSeasonUseCase, SeasonCommand};
use crate::ports::human_player::HumanRequest;
use crate::ports::presentation::{Announcement, Tone};
use house_domain::nomination::{self, CeremonyBeat, ceremony_beats};
use house_domain::{CompetitorId, Phase, PhaseTicket};
use serde_json::json;
use tracing::{debug, info, warn};

impl RunSeasonUseCase {
    pub(super) async fn run_nomination(&mut self) -> Result<Phase, RunSeasonError> {
        let ticket = self.state.ticket();
        self.state.clear_round();
        self.roster.clear_nominations();

        let Some(holder) = self.ensure_power_holder() else {
            warn!("Nobody can hold power, skipping nominations");
            self.settle(ticket);
            return Ok(Phase::Veto);
        };

        let pool = nomination::eligible_pool(&self.state, &self.roster);
        let slots = nomination::slots(&self.params.twists, pool.len());

        self.narrate(
            Announcement::new("Nomination Ceremony")
                .line(format!(
                    "{} must nominate {} houseguests for eviction.",
                    self.name(holder),
                    slots
                ))
                .tone(Tone::Dramatic),
        )
        .await;
        self.open_window();

        let human_picks = if self.roster.is_human(holder) {
            self.ask_human(
                holder,
                HumanRequest::Nominate {
                    pool: pool.clone(),
                    slots,
                },
            );
            let picks = self.await_nominations(holder, &pool, slots).await?;
            self.human.on_turn_closed(ticket);
            picks
        } else {
            None
        };
        let picks = human_picks.unwrap_or_else(|| {
            nomination::ai_select(holder, &pool, slots, &self.roster, &self.graph)
        });

        if self.finalize_nominations(ticket, &picks) {
            for beat in ceremony_beats(&picks) {
                let announcement = self.ceremony_announcement(holder, &beat);
                self.narrate(announcement).await;
            }
        }
        Ok(Phase::Veto)
    }

    /// Current power-holder, handing power to the first living competitor if
    /// the seat is empty.
    fn ensure_power_holder(&mut self) -> Option<CompetitorId> {
        if let Some(holder) = self.state.power_holder
            && self.roster.is_living(holder)
        {
            return Some(holder);
        }
        let holder = self.roster.living_ids().into_iter().next()?;
        warn!("Power seat empty, handing it to {}", self.name(holder));
        self.state.power_holder = Some(holder);
        self.roster.hand_power_to(holder);
        Some(holder)
    }

    async fn await_nominations(
        &mut self,
        holder: CompetitorId,
        pool: &[CompetitorId],
        slots: usize,
    ) -> Result<Option<Vec<CompetitorId>>, RunSeasonError> {
        loop {
            match self.next_step().await? {
                Step::Command(SeasonCommand::SubmitNominations {
                    nominator,
                    picks,
                    reply,
                    ..
                }) => {
                    let result = check_nominations(nominator, holder, &picks, pool, slots);
                    let accepted = result.is_ok();
                    if let Err(e) = &result {
                        debug!("Nominations refused: {}", e);
                    }
                    let _ = reply.send(result);
                    if accepted {
                        return Ok(Some(picks));
                    }
                }
                Step::Command(SeasonCommand::ForceResolve { .. }) | Step::Deadline => {
                    info!("No nominations from {}, picking for them", self.name(holder));
                    return Ok(None);
                }
                Step::Command(other) => self.refuse(other),
                Step::Deferred(_) => {}
            }
        }
    }

    /// Put `picks` on the block once for `ticket`.
    pub(super) fn finalize_nominations(
        &mut self,
        ticket: PhaseTicket,
        picks: &[CompetitorId],
    ) -> bool {
        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("Nominations not applied: {}", rejection);
            return false;
        }
        nomination::finalize(picks, &mut self.state, &mut self.roster, &mut self.graph);
        self.round.nominees = picks.to_vec();
        self.log(
            "nominations",
            json!({ "holder": self.state.power_holder, "nominees": picks }),
        );
        self.commit(ticket);
        true
    }

    fn ceremony_announcement(&self, holder: CompetitorId, beat: &CeremonyBeat) -> Announcement {
        match beat {
            CeremonyBeat::HouseAddress => Announcement::new("Nomination Ceremony")
                .line(format!("{} takes the keys.", self.name(holder))),
            CeremonyBeat::Reveal { slot, nominee } => {
                Announcement::new(format!("Nominee #{}", slot))
                    .line(self.name(*nominee))
                    .tone(Tone::Bad)
                    .emphasized()
            }
            CeremonyBeat::Adjournment => Announcement::new("The ceremony is adjourned")
                .line(format!("On the block: {}", self.names(&self.state.nominees))),
        }
    }
}

/// Validate a human nomination without touching state.
fn check_nominations(
    nominator: CompetitorId,
    holder: CompetitorId,
    picks: &[CompetitorId],
    pool: &[CompetitorId],
    slots: usize,
) -> Result<(), HumanActionError> {
    if nominator != holder {
        return Err(HumanActionError::NotYourTurn(nominator));
    }
    nomination::validate(picks, slots, pool, Some(holder))?;
    Ok(())
}
