//! Member database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list for `members` reads. The password hash is never selected here.
pub const MEMBER_COLUMNS: &str = "id, username, email, phone_country_code, phone_number, \
     first_name, last_name, address, date_of_birth, experience, \
     email_verified, phone_verified, profile_bonus_credited, points, \
     role, status, card_code, created_at, updated_at";

/// Database model for members table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_country_code: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub experience: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub profile_bonus_credited: bool,
    pub points: i64,
    pub role: String,
    pub status: String,
    pub card_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
