//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Ids are serialized as strings.

use chrono::{DateTime, NaiveDate, Utc};
use club_common::TokenPair;
use club_core::{
    EventCategory, EventPhase, EventStatus, FeeStructure, Level, MemberRole, MemberStatus,
    RegistrationBlocker, VerificationChannel, Venue,
};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Keyset page; pass `next_cursor` back as `after` to continue
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> PageResponse<T> {
    /// Build a page, emitting a cursor only when the page is full
    pub fn new(data: Vec<T>, limit: i64, cursor_of: impl Fn(&T) -> String) -> Self {
        let full = i64::try_from(data.len()).is_ok_and(|len| len >= limit);
        let next_cursor = if full { data.last().map(cursor_of) } else { None };
        Self { data, next_cursor }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub member: MemberResponse,
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, member: MemberResponse) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            member,
        }
    }
}

// ============================================================================
// Member Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PhoneResponse {
    pub country_code: String,
    pub number: String,
    pub e164: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub experience: Option<String>,
    pub complete: bool,
}

/// Full member representation, shown to the member themself and to admins
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: PhoneResponse,
    pub profile: ProfileResponse,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub points: i64,
    pub level: Level,
    pub level_title: &'static str,
    /// Achievement record ids, in award order
    pub achievements: Vec<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member as seen by other members
#[derive(Debug, Clone, Serialize)]
pub struct PublicMemberResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub points: i64,
    pub level: Level,
    pub level_title: &'static str,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Achievement Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AchievementResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Points credited when the record was minted
    pub points: i64,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntryResponse {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub points: i64,
    /// Whether records are ever minted for this entry
    pub awarded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreCardResponse {
    pub points: i64,
    pub level: Level,
    pub title: &'static str,
    pub next_level: Option<Level>,
    pub points_to_next_level: Option<i64>,
    /// Catalog entries whose condition holds now, held or not
    pub satisfied: Vec<&'static str>,
    /// Titles of the records the member actually holds
    pub held: Vec<String>,
}

/// Result of an admin point adjustment
#[derive(Debug, Serialize)]
pub struct PointsAdjustedResponse {
    pub member: MemberResponse,
    /// Signed change actually applied after clamping at zero
    pub applied_delta: i64,
}

// ============================================================================
// Verification Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VerificationIssuedResponse {
    pub channel: VerificationChannel,
    pub expires_in_secs: u64,
    /// Only present when codes are exposed for development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerificationResultResponse {
    pub member: MemberResponse,
    pub credited: i64,
    pub minted: Vec<AchievementResponse>,
}

// ============================================================================
// Virtual ID Card
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VirtualCardResponse {
    pub member_id: String,
    pub card_code: String,
    pub display_name: String,
    pub username: String,
    pub level: Level,
    pub title: &'static str,
    pub points: i64,
    pub achievements: Vec<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub member_since: DateTime<Utc>,
    pub status: MemberStatus,
}

// ============================================================================
// Event Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CapacityResponse {
    pub max_participants: Option<i32>,
    pub registered: i32,
    pub remaining: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub venue: Venue,
    pub capacity: CapacityResponse,
    pub fees: FeeStructure,
    pub min_points: i64,
    pub status: EventStatus,
    /// Display bucket; absent for drafts
    pub phase: Option<EventPhase>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub event_id: String,
    pub can_register: bool,
    pub already_registered: bool,
    pub phase: Option<EventPhase>,
    pub blockers: Vec<RegistrationBlocker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResponse {
    pub id: String,
    pub event_id: String,
    pub member_id: String,
    pub registered_at: DateTime<Utc>,
}

// ============================================================================
// Health Check Responses
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One dependency's readiness
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: Vec<HealthCheck>,
}

impl ReadinessResponse {
    pub fn is_ready(&self) -> bool {
        self.checks.iter().all(|check| check.error.is_none())
    }
}
