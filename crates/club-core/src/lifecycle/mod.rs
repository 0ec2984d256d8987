//! Event lifecycle classification and registration eligibility
//!
//! All checks are pure functions of the event, the member and `now`. They
//! stay separate so callers can report each blocker on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Event, EventStatus, Member};
use crate::error::DomainError;
use crate::value_objects::Points;

/// Display bucket for a non-draft event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    Current,
    Upcoming,
    Past,
}

impl EventPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }
}

impl std::str::FromStr for EventPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            other => Err(format!("unknown event phase: {other}")),
        }
    }
}

pub fn is_draft(event: &Event) -> bool {
    event.status == EventStatus::Draft
}

/// Anything that isn't a draft is displayable
pub fn is_published(event: &Event) -> bool {
    !is_draft(event)
}

/// Classify a displayable event. Drafts have no phase.
pub fn classify(event: &Event, now: DateTime<Utc>) -> Option<EventPhase> {
    if is_draft(event) {
        return None;
    }
    let schedule = &event.schedule;
    if schedule.ends_at < now {
        Some(EventPhase::Past)
    } else if schedule.starts_at > now {
        Some(EventPhase::Upcoming)
    } else {
        Some(EventPhase::Current)
    }
}

/// The registration deadline has not passed
pub fn registration_open(event: &Event, now: DateTime<Utc>) -> bool {
    now <= event.schedule.registration_deadline
}

/// The member has enough points for the event's gate
pub fn meets_points(member: &Member, event: &Event) -> bool {
    member.points >= event.eligibility.min_points
}

/// The stored status accepts registrations: published and not already over
pub fn status_permits(event: &Event, now: DateTime<Utc>) -> bool {
    event.status == EventStatus::Published
        && matches!(
            classify(event, now),
            Some(EventPhase::Current | EventPhase::Upcoming)
        )
}

pub fn has_capacity(event: &Event) -> bool {
    event.capacity.has_room()
}

/// Deadline, points and status all allow registration. Capacity is
/// checked separately.
pub fn can_register(member: &Member, event: &Event, now: DateTime<Utc>) -> bool {
    registration_open(event, now) && meets_points(member, event) && status_permits(event, now)
}

/// A reason a member cannot register right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RegistrationBlocker {
    /// Deadline has passed
    Closed,
    NotEligible { required: Points, actual: Points },
    /// Draft, closed, or already over
    NotOpen,
    Full,
}

/// Every blocker that applies, in banner order
pub fn registration_blockers(
    member: &Member,
    event: &Event,
    now: DateTime<Utc>,
) -> Vec<RegistrationBlocker> {
    let mut blockers = Vec::new();
    if !status_permits(event, now) {
        blockers.push(RegistrationBlocker::NotOpen);
    }
    if !registration_open(event, now) {
        blockers.push(RegistrationBlocker::Closed);
    }
    if !meets_points(member, event) {
        blockers.push(RegistrationBlocker::NotEligible {
            required: event.eligibility.min_points,
            actual: member.points,
        });
    }
    if !has_capacity(event) {
        blockers.push(RegistrationBlocker::Full);
    }
    blockers
}

impl From<RegistrationBlocker> for DomainError {
    fn from(blocker: RegistrationBlocker) -> Self {
        match blocker {
            RegistrationBlocker::Closed => Self::RegistrationClosed,
            RegistrationBlocker::NotEligible { required, actual } => {
                Self::NotEligible { required, actual }
            }
            RegistrationBlocker::NotOpen => Self::EventNotOpen,
            RegistrationBlocker::Full => Self::EventFull,
        }
    }
}

/// Fail with the first blocker, if any. Storage backends call this again
/// after locking the event row.
pub fn ensure_can_register(
    member: &Member,
    event: &Event,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    match registration_blockers(member, event, now).into_iter().next() {
        Some(blocker) => Err(blocker.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::{at, event, member};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_current_at_midday() {
        let event = event();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(classify(&event, now), Some(EventPhase::Current));
    }

    #[test]
    fn test_boundaries_are_current() {
        let event = event();
        assert_eq!(classify(&event, event.schedule.starts_at), Some(EventPhase::Current));
        assert_eq!(classify(&event, event.schedule.ends_at), Some(EventPhase::Current));
    }

    #[test]
    fn test_upcoming_and_past() {
        let event = event();
        assert_eq!(classify(&event, at(2025, 2, 28, 0)), Some(EventPhase::Upcoming));
        assert_eq!(classify(&event, at(2025, 3, 3, 0)), Some(EventPhase::Past));
    }

    #[test]
    fn test_drafts_have_no_phase() {
        let mut event = event();
        event.status = EventStatus::Draft;
        assert!(is_draft(&event));
        assert!(!is_published(&event));
        assert_eq!(classify(&event, at(2025, 3, 1, 12)), None);
    }

    #[test]
    fn test_classify_partitions_published_events() {
        let mut event = event();
        for status in [EventStatus::Published, EventStatus::Closed] {
            event.status = status;
            let start = at(2025, 2, 27, 0);
            for hour in 0..(24 * 6) {
                let now = start + Duration::hours(hour);
                let phase = classify(&event, now).expect("published events always classify");
                let expected = [
                    now > event.schedule.ends_at,
                    now < event.schedule.starts_at,
                    now >= event.schedule.starts_at && now <= event.schedule.ends_at,
                ];
                assert_eq!(expected.iter().filter(|b| **b).count(), 1);
                match phase {
                    EventPhase::Past => assert!(expected[0]),
                    EventPhase::Upcoming => assert!(expected[1]),
                    EventPhase::Current => assert!(expected[2]),
                }
            }
        }
    }

    #[test]
    fn test_can_register_false_after_deadline() {
        let mut event = event();
        event.capacity.max_participants = None;
        let member = member();
        let deadline = event.schedule.registration_deadline;

        assert!(can_register(&member, &event, deadline));
        let late = deadline + Duration::seconds(1);
        assert!(has_capacity(&event));
        assert!(meets_points(&member, &event));
        assert!(!can_register(&member, &event, late));
        assert_eq!(
            registration_blockers(&member, &event, late),
            vec![RegistrationBlocker::Closed]
        );
    }

    #[test]
    fn test_points_gate() {
        let mut event = event();
        event.eligibility.min_points = Points::new(100);
        let mut member = member();
        member.points = Points::new(99);
        let now = at(2025, 2, 20, 0);

        assert!(!can_register(&member, &event, now));
        assert_eq!(
            registration_blockers(&member, &event, now),
            vec![RegistrationBlocker::NotEligible {
                required: Points::new(100),
                actual: Points::new(99),
            }]
        );

        member.points = Points::new(100);
        assert!(can_register(&member, &event, now));
    }

    #[test]
    fn test_closed_status_blocks_but_keeps_phase() {
        let mut event = event();
        event.status = EventStatus::Closed;
        let now = at(2025, 2, 20, 0);
        assert_eq!(classify(&event, now), Some(EventPhase::Upcoming));
        assert!(!status_permits(&event, now));
        assert!(!can_register(&member(), &event, now));
    }

    #[test]
    fn test_ensure_can_register_reports_first_blocker() {
        let mut event = event();
        let member = member();
        assert!(ensure_can_register(&member, &event, at(2025, 2, 20, 0)).is_ok());

        event.status = EventStatus::Draft;
        assert!(matches!(
            ensure_can_register(&member, &event, at(2025, 2, 20, 0)),
            Err(DomainError::EventNotOpen)
        ));

        event.status = EventStatus::Published;
        event.capacity.registered = 2;
        assert!(matches!(
            ensure_can_register(&member, &event, at(2025, 2, 20, 0)),
            Err(DomainError::EventFull)
        ));
    }

    #[test]
    fn test_full_is_reported_separately() {
        let mut event = event();
        event.capacity.registered = 2;
        let member = member();
        let now = at(2025, 2, 20, 0);
        assert!(can_register(&member, &event, now));
        assert_eq!(
            registration_blockers(&member, &event, now),
            vec![RegistrationBlocker::Full]
        );
    }
}
