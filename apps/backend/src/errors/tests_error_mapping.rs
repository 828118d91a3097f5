// Unit tests for error mapping - pure domain logic without transport dependencies
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds_to_codes() {
    let de = DomainError::validation(ValidationKind::KillBlocked, "two bystanders");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::KillBlocked);
    assert!(app.is_validation());
    assert_eq!(app.detail(), "two bystanders");

    let other = DomainError::validation_other("something odd");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Match, "no match");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "MATCH_NOT_FOUND");
    assert!(app.is_not_found());

    let nf = DomainError::not_found(NotFoundKind::Participant, "no seat");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "PARTICIPANT_NOT_FOUND");
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "TIMEOUT");
    assert!(matches!(app, AppError::Internal { .. }));

    let down = DomainError::infra(InfraErrorKind::Unavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "UNAVAILABLE");
}

#[test]
fn config_errors_carry_config_code() {
    let app = AppError::config("BEANPOT_VOTING_SECS must be a number");
    assert_eq!(app.code(), ErrorCode::ConfigError);
    assert!(app.to_string().contains("BEANPOT_VOTING_SECS"));
}
