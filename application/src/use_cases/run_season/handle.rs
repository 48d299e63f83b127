//! External entry points into a running season.

use house_domain::{CompetitorId, NominationError, PhaseTicket, ScoreRejection};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Why a human action was refused
///
/// A refused action never changes season state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HumanActionError {
    #[error("ticket {0} is no longer current")]
    StalePhase(PhaseTicket),

    #[error("{0} has no decision to make right now")]
    NotYourTurn(CompetitorId),

    #[error("invalid nominations: {0}")]
    InvalidNomination(#[from] NominationError),

    #[error("invalid score: {0}")]
    InvalidScore(#[from] ScoreRejection),

    #[error("{0} has already acted")]
    AlreadyCast(CompetitorId),

    #[error("{0} is not a valid choice")]
    InvalidChoice(CompetitorId),

    #[error("the season is no longer running")]
    SeasonClosed,
}

pub(crate) type Reply = oneshot::Sender<Result<(), HumanActionError>>;

/// Commands accepted by the scheduler
#[derive(Debug)]
pub(crate) enum SeasonCommand {
    SubmitScore {
        ticket: PhaseTicket,
        competitor: CompetitorId,
        raw: f64,
        reply: Reply,
    },
    SubmitNominations {
        ticket: PhaseTicket,
        nominator: CompetitorId,
        picks: Vec<CompetitorId>,
        reply: Reply,
    },
    DecideVeto {
        ticket: PhaseTicket,
        holder: CompetitorId,
        save: Option<CompetitorId>,
        reply: Reply,
    },
    NameReplacement {
        ticket: PhaseTicket,
        holder: CompetitorId,
        replacement: CompetitorId,
        reply: Reply,
    },
    CastEvictionVote {
        ticket: PhaseTicket,
        voter: CompetitorId,
        target: CompetitorId,
        reply: Reply,
    },
    ChooseFinalist {
        ticket: PhaseTicket,
        holder: CompetitorId,
        evict: CompetitorId,
        reply: Reply,
    },
    CastJuryBallot {
        ticket: PhaseTicket,
        juror: CompetitorId,
        finalist: CompetitorId,
        reply: Reply,
    },
    CastReturnVote {
        ticket: PhaseTicket,
        voter: CompetitorId,
        juror: CompetitorId,
        reply: Reply,
    },
    ForceResolve {
        ticket: PhaseTicket,
    },
}

impl SeasonCommand {
    pub(crate) fn ticket(&self) -> PhaseTicket {
        match self {
            SeasonCommand::SubmitScore { ticket, .. }
            | SeasonCommand::SubmitNominations { ticket, .. }
            | SeasonCommand::DecideVeto { ticket, .. }
            | SeasonCommand::NameReplacement { ticket, .. }
            | SeasonCommand::CastEvictionVote { ticket, .. }
            | SeasonCommand::ChooseFinalist { ticket, .. }
            | SeasonCommand::CastJuryBallot { ticket, .. }
            | SeasonCommand::CastReturnVote { ticket, .. }
            | SeasonCommand::ForceResolve { ticket } => *ticket,
        }
    }

    /// Competitor acting, if the command has one
    pub(crate) fn actor(&self) -> Option<CompetitorId> {
        match self {
            SeasonCommand::SubmitScore { competitor, .. } => Some(*competitor),
            SeasonCommand::SubmitNominations { nominator, .. } => Some(*nominator),
            SeasonCommand::DecideVeto { holder, .. }
            | SeasonCommand::NameReplacement { holder, .. }
            | SeasonCommand::ChooseFinalist { holder, .. } => Some(*holder),
            SeasonCommand::CastEvictionVote { voter, .. }
            | SeasonCommand::CastReturnVote { voter, .. } => Some(*voter),
            SeasonCommand::CastJuryBallot { juror, .. } => Some(*juror),
            SeasonCommand::ForceResolve { .. } => None,
        }
    }

    /// Answer the command with `result`, if it expects an answer.
    pub(crate) fn respond(self, result: Result<(), HumanActionError>) {
        let reply = match self {
            SeasonCommand::SubmitScore { reply, .. }
            | SeasonCommand::SubmitNominations { reply, .. }
            | SeasonCommand::DecideVeto { reply, .. }
            | SeasonCommand::NameReplacement { reply, .. }
            | SeasonCommand::CastEvictionVote { reply, .. }
            | SeasonCommand::ChooseFinalist { reply, .. }
            | SeasonCommand::CastJuryBallot { reply, .. }
            | SeasonCommand::CastReturnVote { reply, .. } => reply,
            SeasonCommand::ForceResolve { .. } => return,
        };
        // The caller may have stopped waiting
        let _ = reply.send(result);
    }
}

/// Cloneable handle for submitting actions to a running season
///
/// Every call carries the ticket of the turn it answers. Decision calls wait
/// for the scheduler to accept or refuse the action.
#[derive(Debug, Clone)]
pub struct SeasonHandle {
    tx: mpsc::UnboundedSender<SeasonCommand>,
}

impl SeasonHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SeasonCommand>) -> Self {
        Self { tx }
    }

    async fn request(
        &self,
        build: impl FnOnce(Reply) -> SeasonCommand,
    ) -> Result<(), HumanActionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .map_err(|_| HumanActionError::SeasonClosed)?;
        rx.await.map_err(|_| HumanActionError::SeasonClosed)?
    }

    pub async fn submit_score(
        &self,
        ticket: PhaseTicket,
        competitor: CompetitorId,
        raw: f64,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::SubmitScore {
            ticket,
            competitor,
            raw,
            reply,
        })
        .await
    }

    pub async fn submit_nominations(
        &self,
        ticket: PhaseTicket,
        nominator: CompetitorId,
        picks: Vec<CompetitorId>,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::SubmitNominations {
            ticket,
            nominator,
            picks,
            reply,
        })
        .await
    }

    /// `save` of `None` declines to use the veto.
    pub async fn decide_veto(
        &self,
        ticket: PhaseTicket,
        holder: CompetitorId,
        save: Option<CompetitorId>,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::DecideVeto {
            ticket,
            holder,
            save,
            reply,
        })
        .await
    }

    pub async fn name_replacement(
        &self,
        ticket: PhaseTicket,
        holder: CompetitorId,
        replacement: CompetitorId,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::NameReplacement {
            ticket,
            holder,
            replacement,
            reply,
        })
        .await
    }

    pub async fn cast_eviction_vote(
        &self,
        ticket: PhaseTicket,
        voter: CompetitorId,
        target: CompetitorId,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::CastEvictionVote {
            ticket,
            voter,
            target,
            reply,
        })
        .await
    }

    /// Final power-holder cuts `evict` and takes the other to the end.
    pub async fn choose_finalist(
        &self,
        ticket: PhaseTicket,
        holder: CompetitorId,
        evict: CompetitorId,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::ChooseFinalist {
            ticket,
            holder,
            evict,
            reply,
        })
        .await
    }

    pub async fn cast_jury_ballot(
        &self,
        ticket: PhaseTicket,
        juror: CompetitorId,
        finalist: CompetitorId,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::CastJuryBallot {
            ticket,
            juror,
            finalist,
            reply,
        })
        .await
    }

    pub async fn cast_return_vote(
        &self,
        ticket: PhaseTicket,
        voter: CompetitorId,
        juror: CompetitorId,
    ) -> Result<(), HumanActionError> {
        self.request(|reply| SeasonCommand::CastReturnVote {
            ticket,
            voter,
            juror,
            reply,
        })
        .await
    }

    /// End the waiting window of the phase named by `ticket` now.
    pub fn force_resolve(&self, ticket: PhaseTicket) -> Result<(), HumanActionError> {
        self.tx
            .send(SeasonCommand::ForceResolve { ticket })
            .map_err(|_| HumanActionError::SeasonClosed)
    }
}
