//! Achievement record database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for achievements table
#[derive(Debug, Clone, FromRow)]
pub struct AchievementModel {
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub points: i64,
    pub awarded_at: DateTime<Utc>,
}

/// Achievement id and title, enough to plan an award
#[derive(Debug, Clone, FromRow)]
pub struct HeldAchievementModel {
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
}
