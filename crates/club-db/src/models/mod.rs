//! Database models - SQLx-compatible structs for PostgreSQL tables

mod achievement;
mod event;
mod member;
mod registration;

pub use achievement::{AchievementModel, HeldAchievementModel};
pub use event::{EventModel, EVENT_COLUMNS};
pub use member::{MemberModel, MEMBER_COLUMNS};
pub use registration::RegistrationModel;
