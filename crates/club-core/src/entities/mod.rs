//! Domain entities - core business objects

mod achievement;
mod event;
mod member;
mod registration;

pub use achievement::AchievementRecord;
pub use event::{
    Capacity, Eligibility, Event, EventCategory, EventSchedule, EventStatus, FeeStructure, Venue,
};
pub use member::{
    Member, MemberProfile, MemberRole, MemberStatus, PhoneNumber, ProfileChanges,
    VerificationChannel,
};
pub use registration::EventRegistration;
