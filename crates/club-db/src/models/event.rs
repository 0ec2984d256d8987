//! Event database models

use chrono::{DateTime, Utc};
use club_core::Venue;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const EVENT_COLUMNS: &str = "id, name, description, category, starts_at, ends_at, \
     registration_deadline, venue, max_participants, registered_count, \
     member_fee_cents, guest_fee_cents, currency, min_points, status, \
     created_by, created_at, updated_at";

/// Database model for events table
#[derive(Debug, Clone, FromRow)]
pub struct EventModel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub venue: Json<Venue>,
    pub max_participants: Option<i32>,
    pub registered_count: i32,
    pub member_fee_cents: i64,
    pub guest_fee_cents: i64,
    pub currency: String,
    pub min_points: i64,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
