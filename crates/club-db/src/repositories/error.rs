//! Error handling utilities for repositories

use club_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Name the member field behind a `members` unique index
pub fn member_conflict(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("members_username_key") => DomainError::UsernameTaken,
        Some("members_email_key") => DomainError::EmailTaken,
        Some("members_phone_key") => DomainError::PhoneTaken,
        Some("members_card_code_key") => DomainError::CardCodeTaken,
        other => DomainError::DatabaseError(format!(
            "unique violation on {}",
            other.unwrap_or("unknown constraint")
        )),
    }
}
