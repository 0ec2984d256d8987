//! Ports implemented by the infrastructure crates

mod repositories;
mod stores;

pub use repositories::{
    AchievementRepository, EventQuery, EventRepository, MemberRepository, PageQuery,
    PointsAdjustment, RegistrationRepository, RepoResult,
};
pub use stores::{CodeCheck, HealthProbe, IssuedCode, SessionStore, VerificationCodeStore};
