//! Event service
//!
//! Event CRUD for admins, listing and display classification for everyone,
//! and seat registration for members.

use chrono::Utc;
use club_core::lifecycle::{classify, registration_blockers, EventPhase};
use club_core::traits::{EventQuery, PageQuery};
use club_core::{
    Capacity, DomainError, Eligibility, Event, EventId, EventSchedule, EventStatus, FeeStructure,
    MemberId, Points,
};
use tracing::{info, instrument};

use crate::dto::{
    CreateEventRequest, EligibilityResponse, EventResponse, FeesInput, PageResponse,
    RegistrationResponse, UpdateEventRequest,
};

use super::access::{is_admin, load_member, require_active, require_admin};
use super::context::ServiceContext;
use super::error::ServiceResult;

impl From<FeesInput> for FeeStructure {
    fn from(input: FeesInput) -> Self {
        Self {
            member_fee_cents: input.member_fee_cents,
            guest_fee_cents: input.guest_fee_cents,
            currency: input.currency.to_uppercase(),
        }
    }
}

/// Listing filter as received from the caller
#[derive(Debug, Clone, Copy)]
pub struct EventListFilter {
    pub phase: Option<EventPhase>,
    pub include_drafts: bool,
    pub page: PageQuery<EventId>,
}

pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Displayable events, optionally one phase only. Drafts are listed
    /// only for admins who ask for them.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        viewer: Option<MemberId>,
        filter: EventListFilter,
    ) -> ServiceResult<PageResponse<EventResponse>> {
        if filter.include_drafts && !is_admin(self.ctx, viewer).await? {
            return Err(DomainError::NotAdmin.into());
        }

        let events = self
            .ctx
            .event_repo()
            .list(EventQuery::from(filter))
            .await?;

        // The cursor follows the unfiltered page so phase filtering never skips rows
        let full = i64::try_from(events.len()).is_ok_and(|len| len >= filter.page.limit);
        let next_cursor = full.then(|| events.last().map(|e| e.id.to_string())).flatten();

        let now = Utc::now();
        let data = events
            .iter()
            .filter(|event| match filter.phase {
                Some(phase) => classify(event, now) == Some(phase),
                None => true,
            })
            .map(|event| EventResponse::at(event, now))
            .collect();

        Ok(PageResponse { data, next_cursor })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, viewer: Option<MemberId>, event_id: EventId) -> ServiceResult<EventResponse> {
        let event = self.visible_event(viewer, event_id).await?;
        Ok(EventResponse::from(&event))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, actor: MemberId, request: CreateEventRequest) -> ServiceResult<EventResponse> {
        require_admin(self.ctx, actor).await?;

        let deadline = request.registration_deadline.unwrap_or(request.starts_at);
        let schedule = EventSchedule::new(request.starts_at, request.ends_at, deadline)?;
        let capacity = request
            .max_participants
            .map_or_else(Capacity::unlimited, Capacity::limited);

        let event = Event::new(
            EventId::new(),
            request.name.trim().to_string(),
            request.description,
            request.category,
            schedule,
            request.venue,
            capacity,
            request.fees.map(FeeStructure::from).unwrap_or_default(),
            Eligibility {
                min_points: Points::new(request.min_points),
            },
            actor,
        );
        self.ctx.event_repo().create(&event).await?;

        info!(event_id = %event.id, actor = %actor, "Event created");
        Ok(EventResponse::from(&event))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        actor: MemberId,
        event_id: EventId,
        request: UpdateEventRequest,
    ) -> ServiceResult<EventResponse> {
        require_admin(self.ctx, actor).await?;
        let mut event = self.find(event_id).await?;

        if let Some(name) = request.name {
            event.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(category) = request.category {
            event.category = category;
        }
        if request.starts_at.is_some()
            || request.ends_at.is_some()
            || request.registration_deadline.is_some()
        {
            let current = event.schedule;
            event.schedule = EventSchedule::new(
                request.starts_at.unwrap_or(current.starts_at),
                request.ends_at.unwrap_or(current.ends_at),
                request
                    .registration_deadline
                    .unwrap_or(current.registration_deadline),
            )?;
        }
        if let Some(venue) = request.venue {
            event.venue = venue;
        }
        if let Some(max) = request.max_participants {
            if max.is_some_and(|limit| limit < 1) {
                return Err(DomainError::invalid_field("max_participants", "must be at least 1").into());
            }
            event.set_max_participants(max)?;
        }
        if let Some(fees) = request.fees {
            event.fees = fees.into();
        }
        if let Some(min_points) = request.min_points {
            event.eligibility.min_points = Points::new(min_points);
        }

        let stored = self.ctx.event_repo().update(&event).await?;
        info!(event_id = %event_id, actor = %actor, "Event updated");
        Ok(EventResponse::from(&stored))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: MemberId, event_id: EventId) -> ServiceResult<()> {
        require_admin(self.ctx, actor).await?;
        self.ctx.event_repo().delete(event_id).await?;
        info!(event_id = %event_id, actor = %actor, "Event deleted");
        Ok(())
    }

    /// Draft or closed to published
    pub async fn publish(&self, actor: MemberId, event_id: EventId) -> ServiceResult<EventResponse> {
        self.transition(actor, event_id, EventStatus::Published).await
    }

    pub async fn close(&self, actor: MemberId, event_id: EventId) -> ServiceResult<EventResponse> {
        self.transition(actor, event_id, EventStatus::Closed).await
    }

    #[instrument(skip(self))]
    async fn transition(
        &self,
        actor: MemberId,
        event_id: EventId,
        next: EventStatus,
    ) -> ServiceResult<EventResponse> {
        require_admin(self.ctx, actor).await?;
        let previous = self.find(event_id).await?.status;
        let event = self
            .ctx
            .event_repo()
            .set_status(event_id, previous, next)
            .await?;

        info!(event_id = %event_id, from = %previous, to = %next, "Event status changed");
        Ok(EventResponse::from(&event))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Every reason the member cannot register right now
    #[instrument(skip(self))]
    pub async fn eligibility(&self, member_id: MemberId, event_id: EventId) -> ServiceResult<EligibilityResponse> {
        let member = load_member(self.ctx, member_id).await?;
        let event = self.visible_event(Some(member_id), event_id).await?;
        let already_registered = self
            .ctx
            .registration_repo()
            .find(event_id, member_id)
            .await?
            .is_some();

        let now = Utc::now();
        let blockers = registration_blockers(&member, &event, now);
        Ok(EligibilityResponse {
            event_id: event_id.to_string(),
            can_register: blockers.is_empty() && !already_registered && member.is_active(),
            already_registered,
            phase: classify(&event, now),
            blockers,
        })
    }

    #[instrument(skip(self))]
    pub async fn register(&self, member_id: MemberId, event_id: EventId) -> ServiceResult<RegistrationResponse> {
        let member = require_active(self.ctx, member_id).await?;
        self.visible_event(Some(member_id), event_id).await?;

        let registration = self
            .ctx
            .registration_repo()
            .register(event_id, &member, Utc::now())
            .await?;

        info!(event_id = %event_id, member_id = %member_id, "Registered for event");
        Ok(RegistrationResponse::from(&registration))
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, member_id: MemberId, event_id: EventId) -> ServiceResult<()> {
        self.ctx.registration_repo().cancel(event_id, member_id).await?;
        info!(event_id = %event_id, member_id = %member_id, "Registration cancelled");
        Ok(())
    }

    pub async fn my_registrations(&self, member_id: MemberId) -> ServiceResult<Vec<RegistrationResponse>> {
        let registrations = self.ctx.registration_repo().find_by_member(member_id).await?;
        Ok(registrations.iter().map(RegistrationResponse::from).collect())
    }

    async fn find(&self, event_id: EventId) -> ServiceResult<Event> {
        Ok(self
            .ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or(DomainError::EventNotFound(event_id))?)
    }

    /// Drafts look absent to everyone but admins
    async fn visible_event(&self, viewer: Option<MemberId>, event_id: EventId) -> ServiceResult<Event> {
        let event = self.find(event_id).await?;
        if event.status == EventStatus::Draft && !is_admin(self.ctx, viewer).await? {
            return Err(DomainError::EventNotFound(event_id).into());
        }
        Ok(event)
    }
}

impl From<EventListFilter> for EventQuery {
    fn from(filter: EventListFilter) -> Self {
        Self {
            include_drafts: filter.include_drafts,
            page: filter.page,
        }
    }
}
