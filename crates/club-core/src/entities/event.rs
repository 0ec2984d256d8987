//! Event entity - a club activity members can register for

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{EventId, MemberId, Points};

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Workshop,
    Meetup,
    Conference,
    Competition,
    Social,
    Webinar,
    Other,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workshop => "workshop",
            Self::Meetup => "meetup",
            Self::Conference => "conference",
            Self::Competition => "competition",
            Self::Social => "social",
            Self::Webinar => "webinar",
            Self::Other => "other",
        }
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workshop" => Ok(Self::Workshop),
            "meetup" => Ok(Self::Meetup),
            "conference" => Ok(Self::Conference),
            "competition" => Ok(Self::Competition),
            "social" => Ok(Self::Social),
            "webinar" => Ok(Self::Webinar),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown event category: {other}")),
        }
    }
}

/// Stored lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Closed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
        }
    }

    /// Draft -> Published -> Closed, with Closed -> Published to reopen.
    /// Nothing goes back to Draft.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published)
                | (Self::Published, Self::Closed)
                | (Self::Closed, Self::Published)
        )
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown event status: {other}")),
        }
    }
}

/// Event timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
}

impl EventSchedule {
    /// Build a schedule, rejecting an end before the start or a
    /// registration deadline after the end
    pub fn new(
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        registration_deadline: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if ends_at < starts_at {
            return Err(DomainError::invalid_field(
                "ends_at",
                "Event cannot end before it starts",
            ));
        }
        if registration_deadline > ends_at {
            return Err(DomainError::invalid_field(
                "registration_deadline",
                "Registration deadline must not be after the event ends",
            ));
        }
        Ok(Self {
            starts_at,
            ends_at,
            registration_deadline,
        })
    }
}

/// Where the event happens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Venue {
    Online { url: String },
    InPerson { name: String, address: String },
}

impl Venue {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online { .. })
    }
}

/// Seat counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capacity {
    /// `None` means unlimited
    pub max_participants: Option<i32>,
    pub registered: i32,
}

impl Capacity {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn limited(max_participants: i32) -> Self {
        Self {
            max_participants: Some(max_participants),
            registered: 0,
        }
    }

    pub fn has_room(&self) -> bool {
        self.max_participants
            .is_none_or(|max| self.registered < max)
    }

    pub fn remaining(&self) -> Option<i32> {
        self.max_participants
            .map(|max| (max - self.registered).max(0))
    }
}

/// Ticket prices in minor currency units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub member_fee_cents: i64,
    pub guest_fee_cents: i64,
    pub currency: String,
}

impl FeeStructure {
    pub fn is_free(&self) -> bool {
        self.member_fee_cents == 0 && self.guest_fee_cents == 0
    }
}

impl Default for FeeStructure {
    fn default() -> Self {
        Self {
            member_fee_cents: 0,
            guest_fee_cents: 0,
            currency: "USD".to_string(),
        }
    }
}

/// Registration gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Eligibility {
    pub min_points: Points,
}

/// Event entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub schedule: EventSchedule,
    pub venue: Venue,
    pub capacity: Capacity,
    pub fees: FeeStructure,
    pub eligibility: Eligibility,
    pub status: EventStatus,
    pub created_by: MemberId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create a new draft event
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        name: String,
        description: String,
        category: EventCategory,
        schedule: EventSchedule,
        venue: Venue,
        capacity: Capacity,
        fees: FeeStructure,
        eligibility: Eligibility,
        created_by: MemberId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            category,
            schedule,
            venue,
            capacity,
            fees,
            eligibility,
            status: EventStatus::Draft,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a new status if the transition is allowed
    pub fn transition_to(&mut self, next: EventStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Change the seat limit; it can't drop below the seats already taken
    pub fn set_max_participants(&mut self, max: Option<i32>) -> Result<(), DomainError> {
        if let Some(limit) = max {
            if limit < self.capacity.registered {
                return Err(DomainError::invalid_field(
                    "max_participants",
                    format!(
                        "Capacity cannot be lower than the {} existing registrations",
                        self.capacity.registered
                    ),
                ));
            }
        }
        self.capacity.max_participants = max;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    /// A published two-day event on 2025-03-01..02 with registration open until the start
    pub fn event() -> Event {
        let schedule =
            EventSchedule::new(at(2025, 3, 1, 0), at(2025, 3, 2, 0), at(2025, 3, 1, 0)).unwrap();
        let mut event = Event::new(
            EventId::new(),
            "Spring Meetup".to_string(),
            "Quarterly meetup".to_string(),
            EventCategory::Meetup,
            schedule,
            Venue::InPerson {
                name: "Club House".to_string(),
                address: "1 Main St".to_string(),
            },
            Capacity::limited(2),
            FeeStructure::default(),
            Eligibility::default(),
            MemberId::new(),
        );
        event.status = EventStatus::Published;
        event
    }
}
