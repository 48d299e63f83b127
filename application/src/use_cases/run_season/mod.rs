//! Run Season use case
//!
//! The phase scheduler. Drives one season from the lobby to the finale,
//! invoking the domain resolvers and narrating through the presentation port.
//!
//! | Phase              | Waits for                          | Resolves with                 |
//! |--------------------|------------------------------------|-------------------------------|
//! | power_competition  | scores (AI deferred, human handle) | `finalize_competition`        |
//! | nomination         | human nominations                  | `finalize_nominations`        |
//! | veto               | scores                             | `finalize_competition`        |
//! | veto_decision      | human veto / replacement           | veto + replacement            |
//! | eviction           | human votes                        | tally, holder breaks ties     |
//! | final_comp_1..3    | scores                             | `finalize_competition`        |
//! | final_decision     | human cut                          | finalist pair                 |
//! | jury_vote          | human ballots                      | tally, tie-break port         |
//!
//! Every wait is a `select!` over the command channel, the deferred AI
//! events and the phase deadline. Events and commands carry the ticket of
//! the phase instance they target; anything stale is dropped. Resolution
//! goes through the [`GameState`] commit guard, so it happens once per
//! instance however many triggers arrive.

mod competition;
mod eviction;
mod finale;
mod handle;
mod nomination;
mod twists;
mod types;
mod veto;

pub use handle::{HumanActionError, SeasonHandle};
pub use types::RunSeasonError;

use handle::SeasonCommand;
use types::{Deferred, Step};

use crate::config::SeasonParams;
use crate::ports::human_player::{HumanPlayerPort, HumanRequest, HumanTurn, NoHumanPlayer};
use crate::ports::presentation::{Announcement, NoPresentation, PresentationSink};
use crate::ports::progress::{NoProgress, SeasonProgressNotifier};
use crate::ports::score_provider::{NoScoreProvider, ScoreProvider};
use crate::ports::season_logger::{NoSeasonLogger, SeasonEvent, SeasonLogger};
use crate::ports::tie_break::{NoTieBreak, TieBreakPort};
use futures::StreamExt;
use house_domain::{
    CompetitionKind, CompetitorId, GameState, JuryVerdict, MIN_ROSTER, Personality, Phase,
    PhaseTicket, RelationshipGraph, Roster, RosterBuilder, SeasonResult, WeekRecord,
};
use rand::RngCore;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tokio_util::time::DelayQueue;
use tracing::{debug, info, warn};

/// Use case for running one season
pub struct RunSeasonUseCase {
    params: SeasonParams,
    roster: Roster,
    graph: RelationshipGraph,
    state: GameState,
    rng: Box<dyn RngCore + Send>,
    score_provider: Arc<dyn ScoreProvider>,
    presentation: Arc<dyn PresentationSink>,
    tie_break: Arc<dyn TieBreakPort>,
    human: Arc<dyn HumanPlayerPort>,
    progress: Arc<dyn SeasonProgressNotifier>,
    logger: Arc<dyn SeasonLogger>,
    cancellation_token: Option<CancellationToken>,
    commands: mpsc::UnboundedReceiver<SeasonCommand>,
    command_tx: mpsc::UnboundedSender<SeasonCommand>,
    deferred: DelayQueue<Deferred>,
    deadline: Instant,
    /// Round being played (one eviction)
    round: WeekRecord,
    weeks: Vec<WeekRecord>,
    verdict: Option<JuryVerdict>,
    returned: Option<CompetitorId>,
}

impl RunSeasonUseCase {
    /// Create a season over `roster`. Social bonds are seeded from `rng`.
    pub fn new(params: SeasonParams, roster: Roster, mut rng: Box<dyn RngCore + Send>) -> Self {
        let graph = RelationshipGraph::seeded(&roster.living_ids(), &mut *rng);
        let mut state = GameState::new();
        state.evictions_remaining = params.twists.evictions_in_week(state.week);
        let (command_tx, commands) = mpsc::unbounded_channel();

        Self {
            params,
            roster,
            graph,
            state,
            rng,
            score_provider: Arc::new(NoScoreProvider),
            presentation: Arc::new(NoPresentation),
            tie_break: Arc::new(NoTieBreak),
            human: Arc::new(NoHumanPlayer),
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoSeasonLogger),
            cancellation_token: None,
            commands,
            command_tx,
            deferred: DelayQueue::new(),
            deadline: Instant::now(),
            round: WeekRecord::new(1),
            weeks: Vec::new(),
            verdict: None,
            returned: None,
        }
    }

    /// Build the roster from `params` and create the season.
    pub fn from_params(
        params: SeasonParams,
        mut rng: Box<dyn RngCore + Send>,
    ) -> Result<Self, RunSeasonError> {
        let mut names = params.names.clone();
        if let Some(human) = &params.human
            && !names.iter().any(|n| n.eq_ignore_ascii_case(human))
        {
            // The human always makes the cast
            names.insert(0, human.clone());
        }
        let mut builder = RosterBuilder::new(names).with_size(params.roster_size);
        if let Some(human) = &params.human {
            builder = builder.with_human(human.clone());
        }
        let roster = builder.build(&mut *rng)?;
        Ok(Self::new(params, roster, rng))
    }

    // ==================== Builder Methods ====================

    pub fn with_score_provider(mut self, provider: Arc<dyn ScoreProvider>) -> Self {
        self.score_provider = provider;
        self
    }

    pub fn with_presentation(mut self, presentation: Arc<dyn PresentationSink>) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_tie_break(mut self, tie_break: Arc<dyn TieBreakPort>) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_human_player(mut self, human: Arc<dyn HumanPlayerPort>) -> Self {
        self.human = human;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn SeasonProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn SeasonLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    // ==================== Accessors ====================

    /// Handle for submitting human actions while the season runs
    pub fn handle(&self) -> SeasonHandle {
        SeasonHandle::new(self.command_tx.clone())
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn params(&self) -> &SeasonParams {
        &self.params
    }

    // ==================== Main Loop ====================

    /// Play the season to the finale.
    pub async fn run(mut self) -> Result<SeasonResult, RunSeasonError> {
        let living = self.roster.living_count();
        if living < MIN_ROSTER {
            return Err(RunSeasonError::RosterTooSmall {
                min: MIN_ROSTER,
                actual: living,
            });
        }

        info!("Starting season with {} competitors", living);
        let cast: Vec<Value> = self
            .roster
            .all()
            .iter()
            .map(|c| json!({ "id": c.id, "name": c.name, "archetype": c.archetype.as_str(), "human": c.is_human }))
            .collect();
        self.log("season_start", json!({ "seed": self.params.seed, "cast": cast }));

        let mut phase = Phase::Lobby;
        loop {
            check_cancelled(&self.cancellation_token)?;
            self.enter(phase);

            let next = match phase {
                Phase::Lobby => self.run_lobby().await,
                Phase::Opening => self.run_opening().await,
                Phase::PowerCompetition => self.run_competition(CompetitionKind::Power).await?,
                Phase::Nomination => self.run_nomination().await?,
                Phase::Veto => self.run_competition(CompetitionKind::Veto).await?,
                Phase::VetoDecision => self.run_veto_decision().await?,
                Phase::Eviction => self.run_eviction().await?,
                Phase::JuryReturn => self.run_jury_return().await,
                Phase::JuryReturnVote => self.run_jury_return_vote().await?,
                Phase::FinalComp1 => self.run_competition(CompetitionKind::FinalPart1).await?,
                Phase::FinalComp2 => self.run_competition(CompetitionKind::FinalPart2).await?,
                Phase::FinalComp3 => self.run_competition(CompetitionKind::FinalPart3).await?,
                Phase::FinalDecision => self.run_final_decision().await?,
                Phase::JuryVote => self.run_jury_vote().await?,
                Phase::Finale => return Ok(self.run_finale().await),
            };

            self.progress.on_phase_complete(&phase);
            phase = next;
        }
    }

    async fn run_lobby(&mut self) -> Phase {
        let names: Vec<String> = self.roster.all().iter().map(|c| c.name.clone()).collect();
        self.narrate(
            Announcement::new("Welcome to the House")
                .line(format!("{} houseguests move in:", names.len()))
                .line(names.join(", ")),
        )
        .await;
        Phase::Opening
    }

    async fn run_opening(&mut self) -> Phase {
        let alliances = self.graph.alliances().len();
        self.narrate(
            Announcement::new("Opening Night")
                .line("The first power competition is about to begin.")
                .line(format!("Alliances already whispering: {}", alliances)),
        )
        .await;
        // A small cast can start straight at the final
        match self.roster.living_count() {
            0..=2 => Phase::JuryVote,
            3 => Phase::FinalComp1,
            _ => Phase::PowerCompetition,
        }
    }

    // ==================== Phase Plumbing ====================

    /// Transition to `phase`: new ticket, pending commit, deadline, social tick.
    fn enter(&mut self, phase: Phase) -> PhaseTicket {
        let ticket = self.state.enter(phase);
        let window = self.window(phase);
        self.deadline = Instant::now() + window;

        let living = self.roster.living_ids();
        let report = self.graph.tick(&mut *self.rng, &living);
        let mingling: Vec<(CompetitorId, Personality)> = living
            .iter()
            .map(|id| (*id, self.roster.personality_of(*id)))
            .collect();
        self.graph.socialize(&mut *self.rng, &mingling);
        for id in &report.formed {
            self.log("alliance_formed", json!({ "alliance": id.to_string() }));
        }
        for (id, reason) in &report.pruned {
            self.log(
                "alliance_pruned",
                json!({ "alliance": id.to_string(), "reason": format!("{:?}", reason) }),
            );
        }

        info!("Week {}: {}", self.state.week, phase);
        self.progress.on_phase_start(&phase, self.state.week, window);
        self.log(
            "phase_enter",
            json!({ "phase": phase.as_str(), "week": self.state.week, "instance": ticket.instance }),
        );
        ticket
    }

    /// Phase window after pace and the fast-round factor
    fn window(&self, phase: Phase) -> Duration {
        let base = self.params.window(phase);
        if !phase.is_endgame() && self.in_fast_round() {
            base.mul_f64(self.params.twists.fast_week_factor.max(0.0))
        } else {
            base
        }
    }

    /// Second or third round of a multi-eviction week
    fn in_fast_round(&self) -> bool {
        self.state.evictions_remaining < self.params.twists.evictions_in_week(self.state.week)
    }

    /// Restart the decision window of the current phase from now.
    fn open_window(&mut self) {
        self.deadline = Instant::now() + self.window(self.state.phase);
    }

    /// Wait for the next command, deferred event or the deadline.
    ///
    /// Stale commands are answered with [`HumanActionError::StalePhase`] and
    /// stale deferred events are dropped; neither reaches the caller.
    async fn next_step(&mut self) -> Result<Step, RunSeasonError> {
        loop {
            let step = tokio::select! {
                biased;
                _ = cancelled(&self.cancellation_token) => return Err(RunSeasonError::Cancelled),
                Some(command) = self.commands.recv() => Step::Command(command),
                Some(expired) = self.deferred.next(), if !self.deferred.is_empty() => {
                    Step::Deferred(expired.into_inner())
                }
                _ = sleep_until(self.deadline) => Step::Deadline,
            };

            match step {
                Step::Command(command) if !self.state.is_current(command.ticket()) => {
                    let ticket = command.ticket();
                    debug!("Ignoring command for stale ticket {}", ticket);
                    command.respond(Err(HumanActionError::StalePhase(ticket)));
                }
                Step::Deferred(deferred) if !self.state.is_current(deferred.ticket) => {
                    debug!("Dropping deferred event for stale ticket {}", deferred.ticket);
                }
                other => return Ok(other),
            }
        }
    }

    /// Answer a command that does not belong to the current decision.
    fn refuse(&self, command: SeasonCommand) {
        match command.actor() {
            Some(actor) => command.respond(Err(HumanActionError::NotYourTurn(actor))),
            None => debug!("Ignoring force-resolve outside a waiting window"),
        }
    }

    fn ask_human(&self, competitor: CompetitorId, request: HumanRequest) {
        debug!("Asking {} to {}", self.roster.name_of(competitor), request.as_str());
        self.human.on_turn(&HumanTurn {
            ticket: self.state.ticket(),
            competitor,
            request,
        });
    }

    /// Claim and immediately commit the current instance (no-op resolution).
    fn settle(&mut self, ticket: PhaseTicket) -> bool {
        if let Err(rejection) = self.state.begin_resolve(ticket) {
            debug!("{}", rejection);
            return false;
        }
        self.commit(ticket);
        true
    }

    fn commit(&mut self, ticket: PhaseTicket) {
        if let Err(rejection) = self.state.commit(ticket) {
            debug!("{}", rejection);
        }
    }

    /// Show an announcement and wait (bounded) for the sink to go idle.
    async fn narrate(&mut self, announcement: Announcement) {
        self.presentation.show_message(&announcement).await;
        let fallback = self.params.presentation_fallback;
        if tokio::time::timeout(fallback, self.presentation.wait_idle())
            .await
            .is_err()
        {
            warn!("Presentation still busy after {:?}, moving on", fallback);
        }
    }

    fn log(&self, event_type: &'static str, payload: Value) {
        self.logger.log(SeasonEvent::new(event_type, payload));
    }

    fn name(&self, id: CompetitorId) -> String {
        self.roster.name_of(id)
    }

    fn names(&self, ids: &[CompetitorId]) -> String {
        ids.iter().map(|id| self.name(*id)).collect::<Vec<_>>().join(", ")
    }

    /// Start the record of a new eviction round.
    fn start_round(&mut self) {
        self.round = WeekRecord::new(self.state.week);
    }

    fn finish_round(&mut self) {
        let record = std::mem::replace(&mut self.round, WeekRecord::new(self.state.week));
        self.progress.on_round_complete(&record);
        self.weeks.push(record);
    }

    fn advance_week(&mut self) {
        self.state.week += 1;
        self.state.evictions_remaining = self.params.twists.evictions_in_week(self.state.week);
    }
}

/// Returns `Err(RunSeasonError::Cancelled)` if the token exists and is cancelled.
fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunSeasonError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunSeasonError::Cancelled);
    }
    Ok(())
}

/// Resolves when the token is cancelled; never without a token.
async fn cancelled(token: &Option<CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseDurations;
    use crate::ports::tie_break::TieBreakRequest;
    use async_trait::async_trait;
    use house_domain::{
        CommitState, CompetitionResolver, NominationError, ScoreRejection, TwistConfig,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NAMES: [&str; 8] = ["Ada", "Ben", "Cy", "Dee", "Eve", "Fay", "Gus", "Hal"];

    fn rng(seed: u64) -> Box<dyn RngCore + Send> {
        Box::new(ChaCha8Rng::seed_from_u64(seed))
    }

    fn params(size: usize, seed: u64) -> SeasonParams {
        SeasonParams::default()
            .with_roster_size(size)
            .with_names(NAMES)
            .with_seed(seed)
            .with_durations(PhaseDurations::uniform(Duration::from_secs(10)))
            .with_presentation_fallback(Duration::from_millis(200))
    }

    fn season(params: SeasonParams) -> RunSeasonUseCase {
        let seed = params.seed.unwrap_or_default();
        RunSeasonUseCase::from_params(params, rng(seed)).unwrap()
    }

    fn id_of(uc: &RunSeasonUseCase, name: &str) -> CompetitorId {
        uc.roster().find_by_name(name).unwrap()
    }

    /// Two living finalists; everyone else already evicted onto the jury
    fn jury_setup(jurors: usize) -> (RunSeasonUseCase, CompetitorId, CompetitorId, Vec<CompetitorId>) {
        let mut uc = season(params(jurors + 2, 3));
        let ids = uc.roster.living_ids();
        let (a, b) = (ids[0], ids[1]);
        let jury = ids[2..].to_vec();
        for id in &jury {
            uc.roster.get_mut(*id).unwrap().evicted = true;
            uc.state.jury.push(*id);
        }
        (uc, a, b, jury)
    }

    fn lean(uc: &mut RunSeasonUseCase, juror: CompetitorId, toward: CompetitorId, away: CompetitorId) {
        uc.graph.set_affinity(juror, toward, 0.9);
        uc.graph.set_affinity(juror, away, -0.9);
    }

    // ==================== Test Doubles ====================

    struct RecordingTieBreak {
        answer: Option<CompetitorId>,
        calls: AtomicUsize,
    }

    impl RecordingTieBreak {
        fn answering(answer: Option<CompetitorId>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TieBreakPort for RecordingTieBreak {
        async fn break_tie(&self, _request: &TieBreakRequest) -> Option<CompetitorId> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    #[derive(Default)]
    struct RecordingHuman {
        turns: Mutex<Vec<HumanTurn>>,
    }

    impl HumanPlayerPort for RecordingHuman {
        fn on_turn(&self, turn: &HumanTurn) {
            self.turns.lock().unwrap().push(turn.clone());
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
    }

    impl SeasonProgressNotifier for RecordingProgress {
        fn on_phase_start(&self, phase: &Phase, _week: u32, _window: Duration) {
            self.phases.lock().unwrap().push(phase.as_str().to_string());
        }

        fn on_phase_complete(&self, _phase: &Phase) {}
    }

    /// Sink that never goes idle
    #[derive(Default)]
    struct StuckSink {
        shown: AtomicUsize,
    }

    #[async_trait]
    impl PresentationSink for StuckSink {
        async fn show_message(&self, _announcement: &Announcement) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }

        async fn wait_idle(&self) {
            std::future::pending::<()>().await
        }
    }

    // ==================== Errors ====================

    #[test]
    fn test_run_season_error_cancelled() {
        let error = RunSeasonError::Cancelled;
        assert_eq!(error.to_string(), "Season cancelled");
        assert!(error.is_cancelled());
        assert!(!RunSeasonError::RosterTooSmall { min: 3, actual: 2 }.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_roster_too_small() {
        let mut uc = season(params(3, 1));
        let ada = id_of(&uc, "Ada");
        uc.roster.get_mut(ada).unwrap().evicted = true;

        let result = uc.run().await;
        assert!(matches!(
            result,
            Err(RunSeasonError::RosterTooSmall { min: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_human_outside_names_joins_cast() {
        let uc = season(params(6, 2).with_human("Zed"));
        let zed = id_of(&uc, "Zed");
        assert_eq!(uc.roster().len(), 6);
        assert!(uc.roster().is_human(zed));
        assert!(uc.roster().find_by_name("Fay").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let result = season(params(6, 1)).with_cancellation(token).run().await;
        assert!(matches!(result, Err(RunSeasonError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_season() {
        let token = CancellationToken::new();
        let uc = season(params(8, 5)).with_cancellation(token.clone());
        let run = tokio::spawn(uc.run());

        tokio::time::sleep(Duration::from_secs(15)).await;
        token.cancel();

        let result = run.await.unwrap();
        assert!(result.unwrap_err().is_cancelled());
    }

    // ==================== Full Seasons ====================

    #[tokio::test(start_paused = true)]
    async fn test_full_ai_season_reaches_finale() {
        let result = season(params(8, 11)).run().await.unwrap();

        let order = result.eviction_order();
        assert_eq!(order.len(), 6);
        assert_ne!(Some(result.winner), result.runner_up);
        assert!(!order.contains(&result.winner));
        assert_eq!(result.jury.len(), 6);
        let expected = result.jury.len() as u32 + u32::from(result.tie_break_used);
        assert_eq!(result.total_jury_votes(), expected);
        assert_eq!(result.seed, Some(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_person_cast_opens_with_the_final() {
        let progress = Arc::new(RecordingProgress::default());
        let result = season(params(3, 7))
            .with_progress(progress.clone())
            .run()
            .await
            .unwrap();

        let phases = progress.phases.lock().unwrap().clone();
        assert_eq!(
            phases,
            vec![
                "lobby",
                "opening",
                "final_comp_1",
                "final_comp_2",
                "final_comp_3",
                "final_decision",
                "jury_vote",
                "finale",
            ]
        );
        assert_eq!(result.eviction_order().len(), 1);
        assert_eq!(result.jury.len(), 1);
        assert_ne!(Some(result.winner), result.runner_up);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_seed_same_season() {
        let first = season(params(7, 42)).run().await.unwrap();
        let second = season(params(7, 42)).run().await.unwrap();

        assert_eq!(first.winner, second.winner);
        assert_eq!(first.eviction_order(), second.eviction_order());
        assert_eq!(first.jury_votes, second.jury_votes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_eviction_week_records_two_rounds() {
        let twists = TwistConfig::default().with_double_eviction(1);
        let result = season(params(6, 13).with_twists(twists)).run().await.unwrap();

        let week_one = result
            .weeks
            .iter()
            .filter(|w| w.week == 1 && w.evicted.is_some())
            .count();
        assert_eq!(week_one, 2);
        assert_eq!(result.eviction_order().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jury_return_brings_a_juror_back() {
        let twists = TwistConfig::default().with_jury_return(5);
        let result = season(params(8, 21).with_twists(twists)).run().await.unwrap();

        let returned = result.returned.expect("a juror should return");
        // One extra eviction for the returning juror
        assert_eq!(result.eviction_order().len(), 7);
        assert!(result.eviction_order().contains(&returned));
    }

    // ==================== Commit Guard ====================

    #[tokio::test(start_paused = true)]
    async fn test_finalize_competition_is_idempotent() {
        let mut uc = season(params(6, 2));
        let ticket = uc.enter(Phase::PowerCompetition);
        let resolver = CompetitionResolver::new(CompetitionKind::Power, uc.roster.living_ids());
        resolver.begin(&mut uc.state);

        let first = uc.finalize_competition(&resolver, ticket).unwrap();
        assert!(uc.finalize_competition(&resolver, ticket).is_none());

        assert_eq!(uc.roster.get(first.winner).unwrap().power_wins, 1);
        assert_eq!(uc.state.power_holder, Some(first.winner));
        assert_eq!(uc.state.commit_state(), CommitState::Committed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalize_with_old_ticket_is_ignored() {
        let mut uc = season(params(6, 2));
        let old = uc.enter(Phase::PowerCompetition);
        let resolver = CompetitionResolver::new(CompetitionKind::Power, uc.roster.living_ids());
        uc.enter(Phase::Nomination);

        assert!(uc.finalize_competition(&resolver, old).is_none());
        assert!(uc.state.power_holder.is_none());
        assert_eq!(uc.state.commit_state(), CommitState::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_score_is_refused() {
        let mut uc = season(params(6, 2).with_human("Ada"));
        let ada = id_of(&uc, "Ada");
        let old = uc.enter(Phase::PowerCompetition);
        uc.enter(Phase::Nomination);
        let handle = uc.handle();

        let (step, reply) = tokio::join!(uc.next_step(), handle.submit_score(old, ada, 9.0));
        assert_eq!(reply, Err(HumanActionError::StalePhase(old)));
        assert!(matches!(step, Ok(Step::Deadline)));
        assert!(uc.state.scores.is_empty());
    }

    // ==================== Human Actions ====================

    #[tokio::test(start_paused = true)]
    async fn test_human_score_counts_and_ai_entries_are_refused() {
        let mut uc = season(params(4, 9).with_human("Ada"));
        let ada = id_of(&uc, "Ada");
        let ben = id_of(&uc, "Ben");
        let ticket = uc.enter(Phase::PowerCompetition);
        let handle = uc.handle();

        let driver = async {
            assert_eq!(
                handle.submit_score(ticket, ben, 99.0).await,
                Err(HumanActionError::NotYourTurn(ben))
            );
            assert_eq!(handle.submit_score(ticket, ada, 1000.0).await, Ok(()));
            assert_eq!(
                handle.submit_score(ticket, ada, 1000.0).await,
                Err(HumanActionError::InvalidScore(ScoreRejection::AlreadySubmitted(ada)))
            );
        };
        let (next, ()) = tokio::join!(uc.run_competition(CompetitionKind::Power), driver);

        assert_eq!(next.unwrap(), Phase::Nomination);
        assert_eq!(uc.state.power_holder, Some(ada));
        assert_eq!(uc.round.power_holder, Some(ada));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_nominations_leave_state_untouched() {
        let human = Arc::new(RecordingHuman::default());
        let mut uc = season(params(6, 4).with_human("Ada")).with_human_player(human.clone());
        let [ada, ben, cy, dee] = ["Ada", "Ben", "Cy", "Dee"].map(|n| id_of(&uc, n));
        uc.state.power_holder = Some(ada);
        uc.roster.hand_power_to(ada);
        let ticket = uc.enter(Phase::Nomination);
        let handle = uc.handle();

        let driver = async {
            assert_eq!(
                handle.submit_nominations(ticket, ada, vec![ben, ben]).await,
                Err(HumanActionError::InvalidNomination(NominationError::Duplicate(ben)))
            );
            assert_eq!(
                handle.submit_nominations(ticket, ada, vec![ben]).await,
                Err(HumanActionError::InvalidNomination(NominationError::WrongCount {
                    expected: 2,
                    actual: 1
                }))
            );
            assert_eq!(
                handle.submit_nominations(ticket, ada, vec![ada, ben]).await,
                Err(HumanActionError::InvalidNomination(NominationError::PowerHolder(ada)))
            );
            assert_eq!(
                handle.submit_nominations(ticket, ben, vec![cy, dee]).await,
                Err(HumanActionError::NotYourTurn(ben))
            );
            assert_eq!(handle.submit_nominations(ticket, ada, vec![ben, cy]).await, Ok(()));
        };
        let (next, ()) = tokio::join!(uc.run_nomination(), driver);

        assert_eq!(next.unwrap(), Phase::Veto);
        assert_eq!(uc.state.nominees, vec![ben, cy]);
        assert_eq!(uc.roster.get(ben).unwrap().times_nominated, 1);
        assert_eq!(uc.roster.get(cy).unwrap().times_nominated, 1);
        assert_eq!(uc.roster.get(dee).unwrap().times_nominated, 0);

        let turns = human.turns.lock().unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].ticket, ticket);
        assert!(matches!(turns[0].request, HumanRequest::Nominate { slots: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_human_holder_falls_back_to_ai() {
        let mut uc = season(params(6, 4).with_human("Ada"));
        let ada = id_of(&uc, "Ada");
        uc.state.power_holder = Some(ada);
        uc.roster.hand_power_to(ada);
        uc.enter(Phase::Nomination);

        assert_eq!(uc.run_nomination().await.unwrap(), Phase::Veto);
        assert_eq!(uc.state.nominees.len(), 2);
        assert!(!uc.state.nominees.contains(&ada));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_human_veto_holder_leaves_veto_unused() {
        let mut uc = season(params(6, 5).with_human("Ada"));
        let [ada, ben, cy, dee] = ["Ada", "Ben", "Cy", "Dee"].map(|n| id_of(&uc, n));
        uc.state.power_holder = Some(ben);
        uc.roster.hand_power_to(ben);
        uc.state.nominees = vec![cy, dee];
        uc.state.veto_holder = Some(ada);
        // Would be saved by an AI holder
        uc.graph.set_affinity(ada, cy, 0.9);
        uc.enter(Phase::VetoDecision);

        assert_eq!(uc.run_veto_decision().await.unwrap(), Phase::Eviction);
        assert_eq!(uc.state.nominees, vec![cy, dee]);
        assert!(uc.round.veto_used_on.is_none());
        assert_eq!(uc.state.commit_state(), CommitState::Committed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_eviction_vote_is_checked() {
        let mut uc = season(params(6, 8).with_human("Ada"));
        let [ada, ben, cy, dee] = ["Ada", "Ben", "Cy", "Dee"].map(|n| id_of(&uc, n));
        uc.state.power_holder = Some(ben);
        uc.roster.hand_power_to(ben);
        uc.state.nominees = vec![cy, dee];
        let ticket = uc.enter(Phase::Eviction);
        let handle = uc.handle();

        let driver = async {
            assert_eq!(
                handle.cast_eviction_vote(ticket, ada, ben).await,
                Err(HumanActionError::InvalidChoice(ben))
            );
            assert_eq!(
                handle.cast_eviction_vote(ticket, cy, dee).await,
                Err(HumanActionError::NotYourTurn(cy))
            );
            assert_eq!(handle.cast_eviction_vote(ticket, ada, dee).await, Ok(()));
        };
        let (next, ()) = tokio::join!(uc.run_eviction(), driver);

        assert_eq!(next.unwrap(), Phase::PowerCompetition);
        assert_eq!(uc.state.week, 2);
        assert_eq!(uc.roster.living_count(), 5);
        assert_eq!(uc.weeks.len(), 1);
        let record = &uc.weeks[0];
        assert!(record.vote_counts.get(&dee).copied().unwrap_or(0) >= 1);
        assert!(matches!(record.evicted, Some(id) if id == cy || id == dee));
    }

    // ==================== Jury Vote ====================

    #[tokio::test(start_paused = true)]
    async fn test_jury_majority_needs_no_tie_break() {
        let tie_break = Arc::new(RecordingTieBreak::answering(None));
        let (uc, a, b, jury) = jury_setup(5);
        let mut uc = uc.with_tie_break(tie_break.clone());
        for juror in &jury[..3] {
            lean(&mut uc, *juror, a, b);
        }
        for juror in &jury[3..] {
            lean(&mut uc, *juror, b, a);
        }
        uc.enter(Phase::JuryVote);

        assert_eq!(uc.run_jury_vote().await.unwrap(), Phase::Finale);
        let verdict = uc.verdict.clone().unwrap();
        assert_eq!(verdict.winner, a);
        assert_eq!(verdict.runner_up, Some(b));
        assert_eq!(verdict.votes[&a], 3);
        assert_eq!(verdict.votes[&b], 2);
        assert_eq!(verdict.clinched_by, Some(a));
        assert_eq!(verdict.ballots.len(), 5);
        assert!(!verdict.tie_break_used);
        assert_eq!(tie_break.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jury_tie_calls_tie_break_once() {
        let (uc, a, b, jury) = jury_setup(4);
        let tie_break = Arc::new(RecordingTieBreak::answering(Some(b)));
        let mut uc = uc.with_tie_break(tie_break.clone());
        for juror in &jury[..2] {
            lean(&mut uc, *juror, a, b);
        }
        for juror in &jury[2..] {
            lean(&mut uc, *juror, b, a);
        }
        uc.enter(Phase::JuryVote);

        uc.run_jury_vote().await.unwrap();
        let verdict = uc.verdict.clone().unwrap();
        assert_eq!(verdict.winner, b);
        assert_eq!(verdict.votes[&b], 3);
        assert_eq!(verdict.votes[&a], 2);
        assert!(verdict.tie_break_used);
        assert_eq!(verdict.clinched_by, None);
        assert_eq!(tie_break.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jury_tie_with_bad_answer_uses_draw() {
        let (uc, a, b, jury) = jury_setup(2);
        let tie_break = Arc::new(RecordingTieBreak::answering(Some(CompetitorId(99))));
        let mut uc = uc.with_tie_break(tie_break.clone());
        lean(&mut uc, jury[0], a, b);
        lean(&mut uc, jury[1], b, a);
        uc.enter(Phase::JuryVote);

        uc.run_jury_vote().await.unwrap();
        let verdict = uc.verdict.clone().unwrap();
        assert!(verdict.winner == a || verdict.winner == b);
        assert!(verdict.tie_break_used);
        assert_eq!(tie_break.calls.load(Ordering::SeqCst), 1);
    }

    // ==================== Presentation ====================

    #[tokio::test(start_paused = true)]
    async fn test_busy_presentation_does_not_stall() {
        let sink = Arc::new(StuckSink::default());
        let mut uc = season(params(4, 1)).with_presentation(sink.clone());
        let started = Instant::now();

        uc.narrate(Announcement::new("Hello")).await;

        assert_eq!(sink.shown.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
