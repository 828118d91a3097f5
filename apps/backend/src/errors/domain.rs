//! Domain-level error type used across services and the engine.
//!
//! This error type is transport- and storage-agnostic. Service entry points
//! return `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rule violations a command can trip over.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Command not legal in the current phase
    PhaseMismatch,
    /// Acting participant is dead
    ParticipantDead,
    /// Destination room is not adjacent to the current room
    NotAdjacent,
    /// Only the impostor may kill
    NotImpostor,
    /// Kill requires exactly one other living participant in the room
    KillBlocked,
    /// Chat text empty or longer than the limit
    ChatLength,
    /// Participant already voted this phase
    AlreadyVoted,
    /// Vote target is not a living participant
    InvalidVoteTarget,
    /// Match is finished; nothing further is accepted
    MatchFinished,
    /// Roster is locked once the match started
    MatchAlreadyStarted,
    /// Roster already holds the maximum number of participants
    RosterFull,
    /// Identity already seated in this match
    AlreadyJoined,
    /// Match cannot start without a full roster
    RosterIncomplete,
    /// Unknown room name
    InvalidRoom,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Match,
    Participant,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    Unavailable,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Command illegal for the current phase or participant state
    Validation(ValidationKind, String),
    /// Unknown match or participant
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// The validation kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}
