//! Event registration database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationModel {
    pub id: Uuid,
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub registered_at: DateTime<Utc>,
}
