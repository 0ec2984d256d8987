//! Test fixtures and data generators
//!
//! Request bodies the server accepts and the slices of its responses the
//! tests inspect.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique within the run and across runs against the same database
pub fn unique_suffix() -> String {
    let run = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", &run[..8], COUNTER.fetch_add(1, Ordering::SeqCst))
}

fn unique_digits() -> String {
    let n = uuid::Uuid::new_v4().as_u128() % 100_000_000;
    format!("10{n:08}")
}

#[derive(Debug, Clone, Serialize)]
pub struct PhoneInput {
    pub country_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: PhoneInput,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("member{suffix}"),
            email: format!("member{suffix}@example.com"),
            password: "TestPass123!".to_string(),
            phone: PhoneInput {
                country_code: "+82".to_string(),
                number: unique_digits(),
            },
            first_name: "Test".to_string(),
            last_name: "Member".to_string(),
            address: None,
            date_of_birth: None,
            experience: None,
        }
    }

    /// Every optional profile field filled in
    pub fn complete() -> Self {
        Self {
            address: Some("1 Harbour Road".to_string()),
            date_of_birth: Some("1990-04-12".to_string()),
            experience: Some("Ten years of weekend climbing".to_string()),
            ..Self::unique()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            login: reg.username.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmVerificationRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub member: MemberResponse,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub username: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub points: i64,
    pub achievements: Vec<String>,
    pub profile: ProfileResponse,
}

#[derive(Debug, Deserialize)]
pub struct AchievementResponse {
    pub title: String,
    pub points: i64,
}

#[derive(Debug, Deserialize)]
pub struct ScoreCardResponse {
    pub points: i64,
    pub held: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerificationIssuedResponse {
    pub channel: String,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerificationResultResponse {
    pub member: MemberResponse,
    pub credited: i64,
    pub minted: Vec<AchievementResponse>,
}

#[derive(Debug, Deserialize)]
pub struct VirtualCardResponse {
    pub member_id: String,
    pub card_code: String,
    pub points: i64,
}

#[derive(Debug, Deserialize)]
pub struct CatalogEntryResponse {
    pub title: String,
    pub points: i64,
}

#[derive(Debug, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub field: Option<String>,
}
