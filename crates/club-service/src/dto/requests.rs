//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use club_core::{EventCategory, MemberRole, MemberStatus, PhoneNumber, Venue};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Letters, digits, `_`, `.` and `-`, starting with a letter or digit
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let mut chars = username.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if starts_ok && rest_ok {
        Ok(())
    } else {
        Err(invalid(
            "username",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ))
    }
}

fn validate_digits(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("digits", "Must contain digits only"))
    }
}

fn validate_country_code(value: &str) -> Result<(), ValidationError> {
    validate_digits(value.strip_prefix('+').unwrap_or(value))
}

fn validate_birth_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date <= Utc::now().date_naive() {
        Ok(())
    } else {
        Err(invalid("date_of_birth", "Date of birth cannot be in the future"))
    }
}

fn validate_venue(venue: &Venue) -> Result<(), ValidationError> {
    match venue {
        Venue::Online { url } => {
            if url.starts_with("https://") || url.starts_with("http://") {
                Ok(())
            } else {
                Err(invalid("venue", "Online venue needs an http(s) URL"))
            }
        }
        Venue::InPerson { name, address } => {
            if name.trim().is_empty() || address.trim().is_empty() {
                Err(invalid("venue", "In-person venue needs a name and an address"))
            } else {
                Ok(())
            }
        }
    }
}

/// Distinguish an absent field from an explicit `null`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Phone number as submitted
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhoneInput {
    #[validate(
        length(min = 1, max = 5, message = "Country code must be 1-4 digits"),
        custom(function = "validate_country_code")
    )]
    pub country_code: String,

    #[validate(
        length(min = 4, max = 15, message = "Phone number must be 4-15 digits"),
        custom(function = "validate_digits")
    )]
    pub number: String,
}

impl From<PhoneInput> for PhoneNumber {
    fn from(input: PhoneInput) -> Self {
        let code = input.country_code.trim_start_matches('+').to_string();
        PhoneNumber::new(code, input.number)
    }
}

/// Member registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Strength rules are checked by the auth service
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(nested)]
    pub phone: PhoneInput,

    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "Experience must be at most 1000 characters"))]
    pub experience: Option<String>,
}

/// Login with a username or an email address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, max = 254, message = "Login is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Body of a logout; without a token every session of the member ends
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token must not be empty"))]
    pub refresh_token: Option<String>,
}

// ============================================================================
// Member Requests
// ============================================================================

/// Profile edit. Absent fields are left alone; an empty optional text
/// field clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "Experience must be at most 1000 characters"))]
    pub experience: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.address.is_none()
            && self.date_of_birth.is_none()
            && self.experience.is_none()
    }
}

/// Submit a one-time code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmVerificationRequest {
    #[validate(
        length(min = 4, max = 10, message = "Code must be 4-10 digits"),
        custom(function = "validate_digits")
    )]
    pub code: String,
}

/// Admin point adjustment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustPointsRequest {
    #[validate(range(min = -1_000_000, max = 1_000_000, message = "Delta out of range"))]
    pub delta: i64,

    #[validate(length(max = 200, message = "Reason must be at most 200 characters"))]
    pub reason: Option<String>,
}

/// Admin change of role or status
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUpdateMemberRequest {
    pub role: Option<MemberRole>,
    pub status: Option<MemberStatus>,
}

// ============================================================================
// Event Requests
// ============================================================================

/// Ticket prices in minor units
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeesInput {
    #[validate(range(min = 0, message = "Fees cannot be negative"))]
    pub member_fee_cents: i64,

    #[validate(range(min = 0, message = "Fees cannot be negative"))]
    pub guest_fee_cents: i64,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
}

/// Create a draft event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Event name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    pub category: EventCategory,

    pub starts_at: DateTime<Utc>,

    pub ends_at: DateTime<Utc>,

    /// Defaults to the start time
    pub registration_deadline: Option<DateTime<Utc>>,

    #[validate(custom(function = "validate_venue"))]
    pub venue: Venue,

    /// Omit for unlimited seats
    #[validate(range(min = 1, max = 100_000, message = "Capacity must be 1-100000"))]
    pub max_participants: Option<i32>,

    #[validate(nested)]
    pub fees: Option<FeesInput>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum points cannot be negative"))]
    pub min_points: i64,
}

/// Partial event edit. `max_participants: null` removes the seat limit.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Event name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub category: Option<EventCategory>,

    pub starts_at: Option<DateTime<Utc>>,

    pub ends_at: Option<DateTime<Utc>>,

    pub registration_deadline: Option<DateTime<Utc>>,

    #[validate(custom(function = "validate_venue"))]
    pub venue: Option<Venue>,

    #[serde(default, deserialize_with = "double_option")]
    pub max_participants: Option<Option<i32>>,

    #[validate(nested)]
    pub fees: Option<FeesInput>,

    #[validate(range(min = 0, message = "Minimum points cannot be negative"))]
    pub min_points: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "Sup3rSecret".to_string(),
            phone: PhoneInput {
                country_code: "+82".to_string(),
                number: "1012345678".to_string(),
            },
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address: None,
            date_of_birth: None,
            experience: None,
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register_request().validate().is_ok());

        let mut short_username = register_request();
        short_username.username = "ab".to_string();
        assert!(short_username.validate().is_err());

        let mut bad_chars = register_request();
        bad_chars.username = "j doe!".to_string();
        assert!(bad_chars.validate().is_err());

        let mut bad_email = register_request();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = register_request();
        short_password.password = "short".to_string();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_nested_phone_is_validated() {
        let mut request = register_request();
        request.phone.number = "12ab5678".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("phone"));
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut request = register_request();
        request.date_of_birth = Some(Utc::now().date_naive() + chrono::Duration::days(2));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_phone_input_strips_plus() {
        let phone: PhoneNumber = register_request().phone.into();
        assert_eq!(phone.country_code, "82");
        assert_eq!(phone.e164(), "+821012345678");
    }

    #[test]
    fn test_login_accepts_username_or_email_key() {
        let by_username: LoginRequest =
            serde_json::from_str(r#"{"username":"jdoe","password":"x"}"#).unwrap();
        assert_eq!(by_username.login, "jdoe");

        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"jdoe@example.com","password":"x"}"#).unwrap();
        assert_eq!(by_email.login, "jdoe@example.com");
    }

    #[test]
    fn test_code_must_be_digits() {
        let ok = ConfirmVerificationRequest {
            code: "012345".to_string(),
        };
        assert!(ok.validate().is_ok());

        let letters = ConfirmVerificationRequest {
            code: "12a456".to_string(),
        };
        assert!(letters.validate().is_err());
    }

    #[test]
    fn test_update_event_distinguishes_null_capacity() {
        let absent: UpdateEventRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.max_participants, None);

        let cleared: UpdateEventRequest =
            serde_json::from_str(r#"{"max_participants":null}"#).unwrap();
        assert_eq!(cleared.max_participants, Some(None));

        let set: UpdateEventRequest =
            serde_json::from_str(r#"{"max_participants":25}"#).unwrap();
        assert_eq!(set.max_participants, Some(Some(25)));
    }

    #[test]
    fn test_create_event_validation() {
        let json = r#"{
            "name": "Trail Day",
            "category": "meetup",
            "starts_at": "2030-05-01T09:00:00Z",
            "ends_at": "2030-05-01T17:00:00Z",
            "venue": { "kind": "online", "url": "ftp://nope" }
        }"#;
        let request: CreateEventRequest = serde_json::from_str(json).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("venue"));
        assert_eq!(request.min_points, 0);
    }
}
