//! Achievement record and registration mappers

use club_core::entities::{AchievementRecord, EventRegistration};
use club_core::value_objects::{AchievementId, EventId, MemberId, Points, RegistrationId};

use crate::models::{AchievementModel, RegistrationModel};

impl From<AchievementModel> for AchievementRecord {
    fn from(model: AchievementModel) -> Self {
        AchievementRecord {
            id: AchievementId::from_uuid(model.id),
            member_id: MemberId::from_uuid(model.member_id),
            title: model.title,
            description: model.description,
            icon: model.icon,
            points: Points::new(model.points),
            awarded_at: model.awarded_at,
        }
    }
}

impl From<RegistrationModel> for EventRegistration {
    fn from(model: RegistrationModel) -> Self {
        EventRegistration {
            id: RegistrationId::from_uuid(model.id),
            event_id: EventId::from_uuid(model.event_id),
            member_id: MemberId::from_uuid(model.member_id),
            registered_at: model.registered_at,
        }
    }
}
