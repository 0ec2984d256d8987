//! Member entity <-> model mapper

use std::str::FromStr;

use club_core::entities::{Member, MemberProfile, MemberRole, MemberStatus, PhoneNumber};
use club_core::error::DomainError;
use club_core::value_objects::{AchievementId, MemberId, Points};

use crate::models::MemberModel;

/// Decode a stored enum column, treating unknown values as corrupt data
pub(crate) fn parse_column<T: FromStr<Err = String>>(value: &str) -> Result<T, DomainError> {
    value.parse::<T>().map_err(DomainError::DatabaseError)
}

/// Build a member from its row and the ids of the records it owns
pub fn member_from_model(
    model: MemberModel,
    achievements: Vec<AchievementId>,
) -> Result<Member, DomainError> {
    Ok(Member {
        id: MemberId::from_uuid(model.id),
        username: model.username,
        email: model.email,
        phone: PhoneNumber::new(model.phone_country_code, model.phone_number),
        profile: MemberProfile {
            first_name: model.first_name,
            last_name: model.last_name,
            address: model.address,
            date_of_birth: model.date_of_birth,
            experience: model.experience,
        },
        email_verified: model.email_verified,
        phone_verified: model.phone_verified,
        profile_bonus_credited: model.profile_bonus_credited,
        points: Points::new(model.points),
        achievements,
        role: parse_column::<MemberRole>(&model.role)?,
        status: parse_column::<MemberStatus>(&model.status)?,
        card_code: model.card_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn model(role: &str) -> MemberModel {
        MemberModel {
            id: Uuid::now_v7(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_country_code: "+44".to_string(),
            phone_number: "7700900123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: None,
            date_of_birth: None,
            experience: None,
            email_verified: true,
            phone_verified: false,
            profile_bonus_credited: false,
            points: 60,
            role: role.to_string(),
            status: "active".to_string(),
            card_code: "ABCDEFGHJK".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_member_from_model() {
        let ids = vec![AchievementId::new()];
        let member = member_from_model(model("admin"), ids.clone()).unwrap();
        assert_eq!(member.role, MemberRole::Admin);
        assert_eq!(member.points, Points::new(60));
        assert_eq!(member.phone.e164(), "+447700900123");
        assert_eq!(member.achievements, ids);
    }

    #[test]
    fn test_unknown_role_is_a_database_error() {
        let err = member_from_model(model("owner"), Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
