//! Terminal input for a human-controlled competitor.
//!
//! The scheduler notifies [`ConsoleHumanPlayer`] without blocking; the turn
//! travels over a channel to [`ConsoleHumanDriver`], which prompts, reads
//! stdin and answers through the [`SeasonHandle`].
//!
//! ```text
//! Nominate 2 of:
//!   1. Bo
//!   2. Cy
//!   3. Di
//! house> 1, Di
//! ```
//!
//! Choices are given by number or by name. `skip` closes the window early and
//! lets the house decide.

use colored::Colorize;
use house_application::ports::human_player::{HumanPlayerPort, HumanRequest, HumanTurn};
use house_application::{HumanActionError, SeasonHandle};
use house_domain::{CompetitorId, PhaseTicket, Roster};
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Phrases for the typing challenge; picked by phase instance
const CHALLENGE_PHRASES: [&str; 6] = [
    "keep your friends close and your votes closer",
    "the house always knows",
    "expect the unexpected",
    "nobody is safe this week",
    "power shifts at midnight",
    "trust is the rarest currency",
];

/// Seconds after which typing speed adds nothing
const CHALLENGE_TIME_LIMIT: f64 = 20.0;

/// Turn notifications forwarded to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    Open(HumanTurn),
    Closed(PhaseTicket),
}

/// [`HumanPlayerPort`] that forwards turns to a [`ConsoleHumanDriver`]
pub struct ConsoleHumanPlayer {
    events: mpsc::UnboundedSender<TurnEvent>,
}

impl ConsoleHumanPlayer {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TurnEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl HumanPlayerPort for ConsoleHumanPlayer {
    fn on_turn(&self, turn: &HumanTurn) {
        let _ = self.events.send(TurnEvent::Open(turn.clone()));
    }

    fn on_turn_closed(&self, ticket: PhaseTicket) {
        let _ = self.events.send(TurnEvent::Closed(ticket));
    }
}

/// Parsed line of human input
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Skip,
    Decline,
    One(CompetitorId),
    Many(Vec<CompetitorId>),
    Typed(String),
}

struct OpenTurn {
    turn: HumanTurn,
    opened: Instant,
}

/// Reads stdin and answers the human's open turns
pub struct ConsoleHumanDriver {
    handle: SeasonHandle,
    names: BTreeMap<CompetitorId, String>,
}

impl ConsoleHumanDriver {
    pub fn new(handle: SeasonHandle, roster: &Roster) -> Self {
        let names = roster
            .all()
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();
        Self { handle, names }
    }

    /// Serve turns until the season closes the channel or `cancel` fires
    pub async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<TurnEvent>,
        cancel: CancellationToken,
    ) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut queue: VecDeque<OpenTurn> = VecDeque::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(TurnEvent::Open(turn)) => {
                        if queue.is_empty() {
                            self.prompt(&turn);
                        }
                        queue.push_back(OpenTurn { turn, opened: Instant::now() });
                    }
                    Some(TurnEvent::Closed(ticket)) => {
                        let before = queue.len();
                        let was_current = queue.front().is_some_and(|t| t.turn.ticket == ticket);
                        queue.retain(|t| t.turn.ticket != ticket);
                        if was_current && queue.len() < before {
                            println!("{}", "  Time's up.".dimmed());
                            self.prompt_front(&mut queue);
                        }
                    }
                    None => break,
                },
                line = lines.next_line(), if !queue.is_empty() => {
                    let Ok(Some(line)) = line else {
                        break;
                    };
                    if self.answer_front(&mut queue, &line).await {
                        queue.pop_front();
                        self.prompt_front(&mut queue);
                    }
                }
            }
        }
    }

    /// Returns `true` once the current turn is finished with.
    async fn answer_front(&self, queue: &mut VecDeque<OpenTurn>, line: &str) -> bool {
        let Some(open) = queue.front_mut() else {
            return true;
        };
        if line.trim().is_empty() {
            self.prompt(&open.turn);
            return false;
        }
        let answer = match parse_answer(&open.turn.request, line, &self.names) {
            Ok(answer) => answer,
            Err(message) => {
                println!("  {} {}", "x".red(), message);
                return false;
            }
        };

        let turn = &open.turn;
        let result = match answer {
            Answer::Skip => self.handle.force_resolve(turn.ticket),
            Answer::Typed(typed) => {
                let target = challenge_phrase(turn.ticket);
                let raw = typing_score(target, &typed, open.opened.elapsed());
                println!("  Score: {:.1}", raw);
                self.handle
                    .submit_score(turn.ticket, turn.competitor, raw)
                    .await
            }
            Answer::Decline => {
                self.handle
                    .decide_veto(turn.ticket, turn.competitor, None)
                    .await
            }
            Answer::Many(picks) => {
                self.handle
                    .submit_nominations(turn.ticket, turn.competitor, picks)
                    .await
            }
            Answer::One(choice) => self.submit_one(turn, choice).await,
        };

        match result {
            Ok(()) => {
                println!("  {}", "Locked in.".green());
                true
            }
            Err(e @ (HumanActionError::StalePhase(_) | HumanActionError::SeasonClosed)) => {
                println!("  {} {}", "x".red(), e);
                true
            }
            Err(e) => {
                println!("  {} {}", "x".red(), e);
                false
            }
        }
    }

    async fn submit_one(
        &self,
        turn: &HumanTurn,
        choice: CompetitorId,
    ) -> Result<(), HumanActionError> {
        let (ticket, me) = (turn.ticket, turn.competitor);
        match &turn.request {
            HumanRequest::UseVeto { .. } => self.handle.decide_veto(ticket, me, Some(choice)).await,
            HumanRequest::NameReplacement { .. } => {
                self.handle.name_replacement(ticket, me, choice).await
            }
            HumanRequest::EvictionVote { .. } | HumanRequest::BreakEvictionTie { .. } => {
                self.handle.cast_eviction_vote(ticket, me, choice).await
            }
            HumanRequest::FinalDecision { .. } => {
                self.handle.choose_finalist(ticket, me, choice).await
            }
            HumanRequest::JuryBallot { .. } => {
                self.handle.cast_jury_ballot(ticket, me, choice).await
            }
            HumanRequest::ReturnVote { .. } => {
                self.handle.cast_return_vote(ticket, me, choice).await
            }
            HumanRequest::Nominate { .. } => {
                self.handle
                    .submit_nominations(ticket, me, vec![choice])
                    .await
            }
            HumanRequest::Compete { .. } => Err(HumanActionError::InvalidChoice(choice)),
        }
    }

    fn prompt_front(&self, queue: &mut VecDeque<OpenTurn>) {
        if let Some(open) = queue.front_mut() {
            open.opened = Instant::now();
            self.prompt(&open.turn);
        }
    }

    fn prompt(&self, turn: &HumanTurn) {
        println!();
        let heading = match &turn.request {
            HumanRequest::Compete { kind } => {
                format!("{}: type this as fast as you can", kind.as_str())
            }
            HumanRequest::Nominate { slots, .. } => format!("Nominate {} of:", slots),
            HumanRequest::UseVeto { .. } => "Use the veto on (or `no`):".to_string(),
            HumanRequest::NameReplacement { .. } => "Name a replacement nominee:".to_string(),
            HumanRequest::EvictionVote { .. } => "Vote to evict:".to_string(),
            HumanRequest::BreakEvictionTie { .. } => "Break the tie, evict:".to_string(),
            HumanRequest::FinalDecision { .. } => "Cut one of:".to_string(),
            HumanRequest::JuryBallot { .. } => "Vote for the winner:".to_string(),
            HumanRequest::ReturnVote { .. } => "Bring back:".to_string(),
        };
        println!("{}", heading.cyan().bold());

        match &turn.request {
            HumanRequest::Compete { .. } => {
                println!("  {}", challenge_phrase(turn.ticket).yellow());
            }
            request => {
                for (i, id) in options(request).iter().enumerate() {
                    println!("  {}. {}", i + 1, self.name(*id));
                }
            }
        }
        print!("{} ", "house>".magenta().bold());
        let _ = std::io::stdout().flush();
    }

    fn name(&self, id: CompetitorId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("?")
    }
}

/// Competitors the request chooses among
pub fn options(request: &HumanRequest) -> &[CompetitorId] {
    match request {
        HumanRequest::Compete { .. } => &[],
        HumanRequest::Nominate { pool, .. } | HumanRequest::NameReplacement { pool } => pool,
        HumanRequest::UseVeto { nominees } | HumanRequest::EvictionVote { nominees } => nominees,
        HumanRequest::BreakEvictionTie { tied } => tied,
        HumanRequest::FinalDecision { candidates } => candidates,
        HumanRequest::JuryBallot { finalists } => finalists,
        HumanRequest::ReturnVote { jurors } => jurors,
    }
}

/// Interpret one line of input for `request`
pub fn parse_answer(
    request: &HumanRequest,
    input: &str,
    names: &BTreeMap<CompetitorId, String>,
) -> Result<Answer, String> {
    let input = input.trim();
    if matches!(input.to_lowercase().as_str(), "skip" | "/skip") {
        return Ok(Answer::Skip);
    }

    let choices = options(request);
    match request {
        HumanRequest::Compete { .. } => Ok(Answer::Typed(input.to_string())),
        HumanRequest::Nominate { .. } => input
            .split([',', ' '])
            .filter(|part| !part.is_empty())
            .map(|part| parse_choice(part, choices, names))
            .collect::<Result<Vec<_>, _>>()
            .map(Answer::Many),
        HumanRequest::UseVeto { .. }
            if matches!(input.to_lowercase().as_str(), "no" | "n" | "pass" | "keep") =>
        {
            Ok(Answer::Decline)
        }
        _ => parse_choice(input, choices, names).map(Answer::One),
    }
}

/// A 1-based position in `choices` or a competitor name
pub fn parse_choice(
    input: &str,
    choices: &[CompetitorId],
    names: &BTreeMap<CompetitorId, String>,
) -> Result<CompetitorId, String> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| choices.get(i))
            .copied()
            .ok_or_else(|| format!("pick a number between 1 and {}", choices.len()));
    }
    choices
        .iter()
        .copied()
        .find(|id| {
            names
                .get(id)
                .is_some_and(|name| name.eq_ignore_ascii_case(input))
        })
        .ok_or_else(|| format!("'{}' is not one of the choices", input))
}

pub fn challenge_phrase(ticket: PhaseTicket) -> &'static str {
    CHALLENGE_PHRASES[(ticket.instance as usize) % CHALLENGE_PHRASES.len()]
}

/// Raw score for the typing challenge: accuracy scaled by speed, 0..=100
pub fn typing_score(target: &str, typed: &str, elapsed: Duration) -> f64 {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.trim().chars().collect();
    let longest = target.len().max(typed.len());
    if longest == 0 {
        return 0.0;
    }
    let matching = target
        .iter()
        .zip(typed.iter())
        .filter(|(a, b)| a.eq_ignore_ascii_case(b))
        .count();
    let accuracy = matching as f64 / longest as f64;
    let speed = (1.0 - elapsed.as_secs_f64() / CHALLENGE_TIME_LIMIT).clamp(0.0, 1.0);
    100.0 * accuracy * (0.5 + 0.5 * speed)
}
