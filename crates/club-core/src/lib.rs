//! # club-core
//!
//! Domain layer containing entities, value objects, the achievement catalog,
//! the score calculator, the award planner, the event lifecycle classifier
//! and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod achievements;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use achievements::{
    plan_award, plan_registration, AchievementDefinition, AwardOutcome, AwardPlan, AwardTrigger,
    Level, LevelInfo, ScoreCard, CATALOG,
};
pub use entities::{
    AchievementRecord, Capacity, Eligibility, Event, EventCategory, EventRegistration,
    EventSchedule, EventStatus, FeeStructure, Member, MemberProfile, MemberRole, MemberStatus,
    PhoneNumber, ProfileChanges, VerificationChannel, Venue,
};
pub use error::DomainError;
pub use lifecycle::{EventPhase, RegistrationBlocker};
pub use traits::{
    AchievementRepository, CodeCheck, EventQuery, EventRepository, HealthProbe, IssuedCode,
    MemberRepository, PageQuery, PointsAdjustment, RegistrationRepository, RepoResult, SessionStore,
    VerificationCodeStore,
};
pub use value_objects::{
    generate_card_code, AchievementId, EventId, IdParseError, MemberId, Points, RegistrationId,
};
