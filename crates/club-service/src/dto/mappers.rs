//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::{DateTime, Utc};
use club_core::achievements::AchievementDefinition;
use club_core::lifecycle::classify;
use club_core::{
    AchievementRecord, Event, EventRegistration, LevelInfo, Member, PhoneNumber, ScoreCard,
};

use super::responses::{
    AchievementResponse, CapacityResponse, CatalogEntryResponse, EventResponse, MemberResponse,
    PhoneResponse, ProfileResponse, PublicMemberResponse, RegistrationResponse,
    ScoreCardResponse, VirtualCardResponse,
};

// ============================================================================
// Member Mappers
// ============================================================================

impl From<&PhoneNumber> for PhoneResponse {
    fn from(phone: &PhoneNumber) -> Self {
        Self {
            country_code: phone.country_code.clone(),
            number: phone.number.clone(),
            e164: phone.e164(),
        }
    }
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        let level = LevelInfo::for_points(member.points);
        let profile = &member.profile;
        Self {
            id: member.id.to_string(),
            username: member.username.clone(),
            email: member.email.clone(),
            phone: PhoneResponse::from(&member.phone),
            profile: ProfileResponse {
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                address: profile.address.clone(),
                date_of_birth: profile.date_of_birth,
                experience: profile.experience.clone(),
                complete: profile.is_complete(),
            },
            email_verified: member.email_verified,
            phone_verified: member.phone_verified,
            points: member.points.value(),
            level: level.level,
            level_title: level.title,
            achievements: member.achievements.iter().map(ToString::to_string).collect(),
            role: member.role,
            status: member.status,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

impl From<&Member> for PublicMemberResponse {
    fn from(member: &Member) -> Self {
        let level = LevelInfo::for_points(member.points);
        Self {
            id: member.id.to_string(),
            username: member.username.clone(),
            display_name: member.display_name(),
            points: member.points.value(),
            level: level.level,
            level_title: level.title,
            created_at: member.created_at,
        }
    }
}

// ============================================================================
// Achievement Mappers
// ============================================================================

impl From<&AchievementRecord> for AchievementResponse {
    fn from(record: &AchievementRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            description: record.description.clone(),
            icon: record.icon.clone(),
            points: record.points.value(),
            awarded_at: record.awarded_at,
        }
    }
}

impl From<&AchievementDefinition> for CatalogEntryResponse {
    fn from(definition: &AchievementDefinition) -> Self {
        Self {
            title: definition.title,
            description: definition.description,
            icon: definition.icon,
            points: definition.points.value(),
            awarded: definition.minted,
        }
    }
}

impl ScoreCardResponse {
    pub fn new(card: ScoreCard, held: Vec<String>) -> Self {
        Self {
            points: card.points.value(),
            level: card.level,
            title: card.title,
            next_level: card.next_level,
            points_to_next_level: card.points_to_next_level,
            satisfied: card.satisfied,
            held,
        }
    }
}

impl VirtualCardResponse {
    /// Card face for a member and the titles of the records they hold
    pub fn new(member: &Member, held: Vec<String>) -> Self {
        let level = LevelInfo::for_points(member.points);
        Self {
            member_id: member.id.to_string(),
            card_code: member.card_code.clone(),
            display_name: member.display_name(),
            username: member.username.clone(),
            level: level.level,
            title: level.title,
            points: member.points.value(),
            achievements: held,
            email_verified: member.email_verified,
            phone_verified: member.phone_verified,
            member_since: member.created_at,
            status: member.status,
        }
    }
}

// ============================================================================
// Event Mappers
// ============================================================================

impl EventResponse {
    /// Render an event with its display bucket as of `now`
    pub fn at(event: &Event, now: DateTime<Utc>) -> Self {
        let capacity = event.capacity;
        Self {
            id: event.id.to_string(),
            name: event.name.clone(),
            description: event.description.clone(),
            category: event.category,
            starts_at: event.schedule.starts_at,
            ends_at: event.schedule.ends_at,
            registration_deadline: event.schedule.registration_deadline,
            venue: event.venue.clone(),
            capacity: CapacityResponse {
                max_participants: capacity.max_participants,
                registered: capacity.registered,
                remaining: capacity.remaining(),
            },
            fees: event.fees.clone(),
            min_points: event.eligibility.min_points.value(),
            status: event.status,
            phase: classify(event, now),
            created_by: event.created_by.to_string(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self::at(event, Utc::now())
    }
}

impl From<&EventRegistration> for RegistrationResponse {
    fn from(registration: &EventRegistration) -> Self {
        Self {
            id: registration.id.to_string(),
            event_id: registration.event_id.to_string(),
            member_id: registration.member_id.to_string(),
            registered_at: registration.registered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use club_core::{MemberId, MemberProfile, Points, CATALOG};

    fn member() -> Member {
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

    #[test]
    fn test_member_response_carries_level() {
        let mut member = member();
        member.points = Points::new(320);
        let response = MemberResponse::from(&member);
        assert_eq!(response.points, 320);
        assert_eq!(response.level_title, "Hero");
        assert_eq!(response.phone.e164, "+821012345678");
        assert!(!response.profile.complete);
    }

    #[test]
    fn test_public_member_hides_contact_details() {
        let json = serde_json::to_value(PublicMemberResponse::from(&member())).unwrap();
        assert_eq!(json["display_name"], "Jane Doe");
        assert!(json.get("email").is_none());
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_catalog_entries_flag_milestones() {
        let entries: Vec<CatalogEntryResponse> = CATALOG.iter().map(Into::into).collect();
        assert!(entries[0].awarded);
        assert!(entries.iter().any(|entry| entry.title == "Explorer" && !entry.awarded));
    }
}
