//! Error codes for the Beanpot engine.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! reported back to command callers.

use core::fmt;

/// Centralized error codes for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Command validation
    PhaseMismatch,
    ParticipantDead,
    NotAdjacent,
    NotImpostor,
    KillBlocked,
    ChatLength,
    AlreadyVoted,
    InvalidVoteTarget,
    MatchFinished,
    MatchAlreadyStarted,
    RosterFull,
    AlreadyJoined,
    RosterIncomplete,
    InvalidRoom,
    /// General validation error
    ValidationError,

    // Resource Not Found
    MatchNotFound,
    ParticipantNotFound,
    /// General not found error
    NotFound,

    // System Errors
    /// Internal error (explicit problem code)
    InternalError,
    /// Operation timed out
    Timeout,
    /// Collaborator unavailable
    Unavailable,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::ParticipantDead => "PARTICIPANT_DEAD",
            Self::NotAdjacent => "NOT_ADJACENT",
            Self::NotImpostor => "NOT_IMPOSTOR",
            Self::KillBlocked => "KILL_BLOCKED",
            Self::ChatLength => "CHAT_LENGTH",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::InvalidVoteTarget => "INVALID_VOTE_TARGET",
            Self::MatchFinished => "MATCH_FINISHED",
            Self::MatchAlreadyStarted => "MATCH_ALREADY_STARTED",
            Self::RosterFull => "ROSTER_FULL",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::RosterIncomplete => "ROSTER_INCOMPLETE",
            Self::InvalidRoom => "INVALID_ROOM",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::InternalError => "INTERNAL_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Unavailable => "UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
