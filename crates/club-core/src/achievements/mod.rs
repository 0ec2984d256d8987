//! Achievements: the static catalog, the pure score calculator, and the
//! award planner shared by every storage backend

pub mod award;
pub mod catalog;
pub mod score;

pub use award::{
    plan_award, plan_registration, AwardOutcome, AwardPlan, AwardTrigger, OpeningBalance,
    RegistrationPlan, PROFILE_COMPLETION_BONUS, VERIFICATION_BONUS,
};
pub use catalog::{AchievementDefinition, UnlockRule, CATALOG, PROFILE_MASTER, WELCOME};
pub use score::{level_for, satisfied_achievements, Level, LevelInfo, ScoreCard};
