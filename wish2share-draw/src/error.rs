use thiserror::Error;

use crate::participant::ParticipantId;

/// Problems with the input that are detected before anything is drawn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("a draw needs at least {minimum} participants, got {count}")]
    TooFewParticipants { count: usize, minimum: usize },
    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("exclusion rule for {0}, who is not a participant")]
    UnknownGiver(ParticipantId),
    #[error("{giver} excludes {recipient}, who is not a participant")]
    UnknownRecipient {
        giver: ParticipantId,
        recipient: ParticipantId,
    },
}

/// No assignment honoring all exclusion rules was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "the exclusion rules make a valid draw impossible ({attempts} attempts{}), loosen them and try again",
    .stuck.as_ref().map(|id| format!(", {id} had nobody left to draw")).unwrap_or_default()
)]
pub struct InfeasibleAssignmentError {
    /// Attempts made before giving up. Zero when a participant has no candidate at all.
    pub attempts: u32,
    /// The giver that ran out of candidates on the last attempt.
    pub stuck: Option<ParticipantId>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("invalid draw input: {0}")]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Infeasible(#[from] InfeasibleAssignmentError),
}

/// An exclusion configuration that would be rejected before it is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRuleError {
    #[error(
        "{participant} would only have {remaining} possible recipients left, at least {required} \
         are required"
    )]
    TooFewOptions {
        participant: ParticipantId,
        remaining: usize,
        required: usize,
    },
    #[error("exclusion rules reference unknown participants: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("names for this event have already been drawn, reset the draw first")]
    AlreadyDrawn,
    #[error("participant {0} is already part of this event")]
    DuplicateParticipant(ParticipantId),
    #[error("participant {0} is not part of this event")]
    UnknownParticipant(ParticipantId),
    #[error("{0}")]
    ExclusionRule(#[from] ExclusionRuleError),
    #[error("{0}")]
    Draw(#[from] DrawError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access event file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("event file {path} is not valid: {source}")]
    Json {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },
}
