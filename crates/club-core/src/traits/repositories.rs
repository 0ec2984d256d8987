//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::achievements::{AwardOutcome, AwardTrigger};
use crate::entities::{
    AchievementRecord, Event, EventRegistration, EventStatus, Member, MemberRole, MemberStatus,
    PhoneNumber, ProfileChanges,
};
use crate::error::DomainError;
use crate::value_objects::{EventId, MemberId, Points};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Keyset pagination over time-ordered ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery<Id> {
    pub after: Option<Id>,
    pub limit: i64,
}

impl<Id> PageQuery<Id> {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(after: Option<Id>, limit: Option<i64>) -> Self {
        Self {
            after,
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }
}

/// Filter for event listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    pub include_drafts: bool,
    pub page: PageQuery<EventId>,
}

/// Result of an admin point adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsAdjustment {
    pub member: Member,
    /// Balance read under the same lock that applied the delta
    pub previous: Points,
}

impl PointsAdjustment {
    /// Delta after clamping at zero
    pub fn applied_delta(&self) -> i64 {
        self.member.points.value() - self.previous.value()
    }
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;

    /// Find member by username (case-insensitive)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Member>>;

    /// Find member by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>>;

    /// Find member by virtual card share code
    async fn find_by_card_code(&self, code: &str) -> RepoResult<Option<Member>>;

    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    async fn phone_exists(&self, phone: &PhoneNumber) -> RepoResult<bool>;

    /// List members ordered by id
    async fn list(&self, page: PageQuery<MemberId>) -> RepoResult<Vec<Member>>;

    /// Insert a new member together with its opening achievement records,
    /// atomically. Unique violations map to the field-specific conflict.
    async fn create(
        &self,
        member: &Member,
        password_hash: &str,
        achievements: &[AchievementRecord],
    ) -> RepoResult<()>;

    /// Apply a profile edit to the stored profile and evaluate
    /// [`AwardTrigger::ProfileUpdated`] in the same unit. Only profile
    /// fields are written.
    async fn update_profile(&self, id: MemberId, changes: &ProfileChanges)
        -> RepoResult<AwardOutcome>;

    /// Set role and/or status, leaving every other column as stored
    async fn set_role_status(
        &self,
        id: MemberId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> RepoResult<Member>;

    /// Replace the share code. A collision maps to `CardCodeTaken`.
    async fn set_card_code(&self, id: MemberId, code: &str) -> RepoResult<Member>;

    /// Hard delete (admin)
    async fn delete(&self, id: MemberId) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: MemberId) -> RepoResult<Option<String>>;

    /// Evaluate and apply an award trigger as one serialized unit per member.
    ///
    /// Implementations lock the member, plan with
    /// [`crate::achievements::plan_award`] against the locked state, and
    /// commit flag changes, credits and minted records together. A grant
    /// that loses a uniqueness race is skipped and not credited.
    async fn apply_award(&self, id: MemberId, trigger: AwardTrigger) -> RepoResult<AwardOutcome>;

    /// Add a signed delta to the balance, clamped at zero. Mints nothing.
    async fn adjust_points(&self, id: MemberId, delta: i64) -> RepoResult<PointsAdjustment>;
}

// ============================================================================
// Achievement Repository
// ============================================================================

#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Records owned by a member, in award order
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<AchievementRecord>>;
}

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>>;

    /// List events ordered by id
    async fn list(&self, query: EventQuery) -> RepoResult<Vec<Event>>;

    async fn create(&self, event: &Event) -> RepoResult<()>;

    /// Persist the editable fields and return the stored event. Status and
    /// the registered counter keep their stored values.
    async fn update(&self, event: &Event) -> RepoResult<Event>;

    /// Move `from` -> `to` only if the stored status is still `from`.
    /// Otherwise fails with `InvalidStatusTransition` from the stored status.
    async fn set_status(&self, id: EventId, from: EventStatus, to: EventStatus)
        -> RepoResult<Event>;

    async fn delete(&self, id: EventId) -> RepoResult<()>;
}

// ============================================================================
// Registration Repository
// ============================================================================

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Claim a seat. Implementations lock the event, re-check eligibility
    /// and capacity against the locked row, insert the registration and
    /// bump the counter in one unit.
    async fn register(
        &self,
        event_id: EventId,
        member: &Member,
        now: DateTime<Utc>,
    ) -> RepoResult<EventRegistration>;

    /// Release a seat
    async fn cancel(&self, event_id: EventId, member_id: MemberId) -> RepoResult<()>;

    async fn find(
        &self,
        event_id: EventId,
        member_id: MemberId,
    ) -> RepoResult<Option<EventRegistration>>;

    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<EventRegistration>>;
}
