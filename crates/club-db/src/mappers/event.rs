//! Event entity <-> model mapper

use club_core::entities::{
    Capacity, Eligibility, Event, EventCategory, EventSchedule, EventStatus, FeeStructure,
};
use club_core::error::DomainError;
use club_core::value_objects::{EventId, MemberId, Points};

use super::member::parse_column;
use crate::models::EventModel;

impl TryFrom<EventModel> for Event {
    type Error = DomainError;

    fn try_from(model: EventModel) -> Result<Self, Self::Error> {
        Ok(Event {
            id: EventId::from_uuid(model.id),
            name: model.name,
            description: model.description,
            category: parse_column::<EventCategory>(&model.category)?,
            // Rows passed the table CHECKs, so the schedule is rebuilt as stored
            schedule: EventSchedule {
                starts_at: model.starts_at,
                ends_at: model.ends_at,
                registration_deadline: model.registration_deadline,
            },
            venue: model.venue.0,
            capacity: Capacity {
                max_participants: model.max_participants,
                registered: model.registered_count,
            },
            fees: FeeStructure {
                member_fee_cents: model.member_fee_cents,
                guest_fee_cents: model.guest_fee_cents,
                currency: model.currency,
            },
            eligibility: Eligibility {
                min_points: Points::new(model.min_points),
            },
            status: parse_column::<EventStatus>(&model.status)?,
            created_by: MemberId::from_uuid(model.created_by),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
