//! Event registration - a member's seat at an event

use chrono::{DateTime, Utc};

use crate::value_objects::{EventId, MemberId, RegistrationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub member_id: MemberId,
    pub registered_at: DateTime<Utc>,
}

impl EventRegistration {
    pub fn new(event_id: EventId, member_id: MemberId) -> Self {
        Self {
            id: RegistrationId::new(),
            event_id,
            member_id,
            registered_at: Utc::now(),
        }
    }
}
