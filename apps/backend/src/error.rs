use thiserror::Error;

use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;

/// Error returned by every engine entry point.
///
/// Validation and not-found errors are reported to the caller only; no
/// match state is mutated when one is returned.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { code, .. } => *code,
        }
    }

    /// Helper method to extract error detail from any error variant
    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. } => detail,
            AppError::NotFound { detail, .. } => detail,
            AppError::Config { detail } => detail,
            AppError::Internal { detail, .. } => detail,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Internal {
            code,
            detail: detail.into(),
        }
    }
}

fn validation_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
        ValidationKind::ParticipantDead => ErrorCode::ParticipantDead,
        ValidationKind::NotAdjacent => ErrorCode::NotAdjacent,
        ValidationKind::NotImpostor => ErrorCode::NotImpostor,
        ValidationKind::KillBlocked => ErrorCode::KillBlocked,
        ValidationKind::ChatLength => ErrorCode::ChatLength,
        ValidationKind::AlreadyVoted => ErrorCode::AlreadyVoted,
        ValidationKind::InvalidVoteTarget => ErrorCode::InvalidVoteTarget,
        ValidationKind::MatchFinished => ErrorCode::MatchFinished,
        ValidationKind::MatchAlreadyStarted => ErrorCode::MatchAlreadyStarted,
        ValidationKind::RosterFull => ErrorCode::RosterFull,
        ValidationKind::AlreadyJoined => ErrorCode::AlreadyJoined,
        ValidationKind::RosterIncomplete => ErrorCode::RosterIncomplete,
        ValidationKind::InvalidRoom => ErrorCode::InvalidRoom,
        ValidationKind::Other(_) => ErrorCode::ValidationError,
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => AppError::Validation {
                code: validation_code(&kind),
                detail,
            },
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Match => ErrorCode::MatchNotFound,
                    NotFoundKind::Participant => ErrorCode::ParticipantNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::NotFound { code, detail }
            }
            DomainError::Infra(kind, detail) => {
                let code = match kind {
                    InfraErrorKind::Timeout => ErrorCode::Timeout,
                    InfraErrorKind::Unavailable => ErrorCode::Unavailable,
                    InfraErrorKind::Other(_) => ErrorCode::InternalError,
                };
                AppError::Internal { code, detail }
            }
        }
    }
}
