//! Member entity - a registered club account

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::AchievementRecord;
use crate::error::DomainError;
use crate::value_objects::{generate_card_code, AchievementId, MemberId, Points};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[default]
    User,
    Admin,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// A contact channel that can be verified with a one-time code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationChannel {
    Email,
    Phone,
}

impl VerificationChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for VerificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            other => Err(format!("unknown verification channel: {other}")),
        }
    }
}

/// Phone number split into country calling code and subscriber number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub country_code: String,
    pub number: String,
}

impl PhoneNumber {
    pub fn new(country_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            number: number.into(),
        }
    }

    /// E.164-style rendering, e.g. `+821012345678`
    pub fn e164(&self) -> String {
        format!("+{}{}", self.country_code.trim_start_matches('+'), self.number)
    }
}

/// Personal profile fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberProfile {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub experience: Option<String>,
}

impl MemberProfile {
    /// All profile fields are present and non-blank
    pub fn is_complete(&self) -> bool {
        fn filled(value: Option<&String>) -> bool {
            value.is_some_and(|v| !v.trim().is_empty())
        }

        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && filled(self.address.as_ref())
            && self.date_of_birth.is_some()
            && filled(self.experience.as_ref())
    }
}

/// A partial profile edit. `None` leaves a field untouched; the optional
/// text fields take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<Option<String>>,
    pub date_of_birth: Option<NaiveDate>,
    pub experience: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.address.is_none()
            && self.date_of_birth.is_none()
            && self.experience.is_none()
    }

    /// Apply onto the stored profile. Names may not end up blank.
    pub fn apply(&self, profile: &mut MemberProfile) -> Result<(), DomainError> {
        if let Some(first_name) = &self.first_name {
            if first_name.trim().is_empty() {
                return Err(DomainError::invalid_field("first_name", "cannot be blank"));
            }
            profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            if last_name.trim().is_empty() {
                return Err(DomainError::invalid_field("last_name", "cannot be blank"));
            }
            profile.last_name.clone_from(last_name);
        }
        if let Some(address) = &self.address {
            profile.address.clone_from(address);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            profile.date_of_birth = Some(date_of_birth);
        }
        if let Some(experience) = &self.experience {
            profile.experience.clone_from(experience);
        }
        Ok(())
    }
}

/// Member entity
///
/// `points`, the verification flags and `achievements` change only through
/// the award path or an admin adjustment, never through a profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub email: String,
    pub phone: PhoneNumber,
    pub profile: MemberProfile,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub profile_bonus_credited: bool,
    pub points: Points,
    /// Owned achievement records, in award order
    pub achievements: Vec<AchievementId>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub card_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a fresh member with a zero balance and no achievements
    pub fn new(
        id: MemberId,
        username: String,
        email: String,
        phone: PhoneNumber,
        profile: MemberProfile,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            phone,
            profile,
            email_verified: false,
            phone_verified: false,
            profile_bonus_credited: false,
            points: Points::ZERO,
            achievements: Vec::new(),
            role: MemberRole::User,
            status: MemberStatus::Active,
            card_code: generate_card_code(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn is_verified(&self, channel: VerificationChannel) -> bool {
        match channel {
            VerificationChannel::Email => self.email_verified,
            VerificationChannel::Phone => self.phone_verified,
        }
    }

    /// Both email and phone are verified
    pub fn is_fully_verified(&self) -> bool {
        self.email_verified && self.phone_verified
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.profile.first_name.trim(), self.profile.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub(crate) fn mark_verified(&mut self, channel: VerificationChannel) {
        match channel {
            VerificationChannel::Email => self.email_verified = true,
            VerificationChannel::Phone => self.phone_verified = true,
        }
    }

    /// Credit a minted record's snapshotted points and append its reference
    pub fn record_achievement(&mut self, record: &AchievementRecord) {
        self.points = self.points.credited(record.points);
        self.achievements.push(record.id);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn member() -> Member {
        Member::new(
            MemberId::new(),
            "jdoe".to_string(),
            "jdoe@example.com".to_string(),
            PhoneNumber::new("82", "1012345678"),
            MemberProfile {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..MemberProfile::default()
            },
        )
    }

    pub fn complete_profile() -> MemberProfile {
        MemberProfile {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address: Some("1 Main St".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2),
            experience: Some("5 years of trail running".to_string()),
        }
    }
}
