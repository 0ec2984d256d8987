//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::{EventStatus, VerificationChannel};
use crate::value_objects::{EventId, MemberId, Points};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Member not found: {0}")]
    UsernameNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Achievement not found: {0}")]
    AchievementNotFound(String),

    #[error("Not registered for this event")]
    RegistrationNotFound,

    #[error("Card not found: {0}")]
    CardNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid verification code")]
    InvalidOtp,

    #[error("Cannot change event status from {from} to {to}")]
    InvalidStatusTransition { from: EventStatus, to: EventStatus },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Administrator role required")]
    NotAdmin,

    #[error("Member account is inactive")]
    InactiveMember,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Phone number already in use")]
    PhoneTaken,

    /// Generated share code collided with an existing one
    #[error("Card code already in use")]
    CardCodeTaken,

    #[error("Achievement already awarded: {0}")]
    DuplicateAchievement(String),

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("{0} is already verified")]
    AlreadyVerified(VerificationChannel),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Registration for this event is closed")]
    RegistrationClosed,

    #[error("Not eligible: requires {required} points, member has {actual}")]
    NotEligible { required: Points, actual: Points },

    #[error("Event is full")]
    EventFull,

    #[error("Event is not open for registration")]
    EventNotOpen,

    // =========================================================================
    // Rate Limiting
    // =========================================================================
    #[error("Too many verification attempts, request a new code")]
    TooManyAttempts,

    #[error("A code was sent recently, retry in {retry_after_secs}s")]
    ResendCooldown { retry_after_secs: u64 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Validation error tied to one input field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) | Self::UsernameNotFound(_) => "UNKNOWN_MEMBER",
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::AchievementNotFound(_) => "UNKNOWN_ACHIEVEMENT",
            Self::RegistrationNotFound => "UNKNOWN_REGISTRATION",
            Self::CardNotFound(_) => "UNKNOWN_CARD",

            // Validation
            Self::ValidationError(_) | Self::InvalidField { .. } => "VALIDATION_ERROR",
            Self::InvalidOtp => "INVALID_OTP",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",

            // Authorization
            Self::NotAdmin => "NOT_ADMIN",
            Self::InactiveMember => "INACTIVE_MEMBER",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::PhoneTaken => "PHONE_TAKEN",
            Self::CardCodeTaken => "CARD_CODE_TAKEN",
            Self::DuplicateAchievement(_) => "DUPLICATE_ACHIEVEMENT",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::AlreadyVerified(_) => "ALREADY_VERIFIED",

            // Business Rules
            Self::RegistrationClosed => "REGISTRATION_CLOSED",
            Self::NotEligible { .. } => "NOT_ELIGIBLE",
            Self::EventFull => "EVENT_FULL",
            Self::EventNotOpen => "EVENT_NOT_OPEN",

            // Rate Limiting
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::ResendCooldown { .. } => "RESEND_COOLDOWN",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// The input field the error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidField { field, .. } => Some(field),
            Self::UsernameTaken => Some("username"),
            Self::EmailTaken => Some("email"),
            Self::PhoneTaken => Some("phone"),
            Self::InvalidOtp => Some("code"),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_)
                | Self::UsernameNotFound(_)
                | Self::EventNotFound(_)
                | Self::AchievementNotFound(_)
                | Self::RegistrationNotFound
                | Self::CardNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidField { .. }
                | Self::InvalidOtp
                | Self::InvalidStatusTransition { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotAdmin | Self::InactiveMember)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken
                | Self::EmailTaken
                | Self::PhoneTaken
                | Self::CardCodeTaken
                | Self::DuplicateAchievement(_)
                | Self::AlreadyRegistered
                | Self::AlreadyVerified(_)
        )
    }

    /// Check if a well-formed request broke a business rule
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::RegistrationClosed | Self::NotEligible { .. } | Self::EventFull | Self::EventNotOpen
        )
    }

    /// Check if the caller should back off before retrying
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::TooManyAttempts | Self::ResendCooldown { .. })
    }
}
