//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use club_core::entities::{Event, EventStatus};
use club_core::error::DomainError;
use club_core::traits::{EventQuery, EventRepository, RepoResult};
use club_core::value_objects::EventId;

use crate::models::{EventModel, EVENT_COLUMNS};

use super::error::map_db_error;

/// PostgreSQL implementation of EventRepository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let model = sqlx::query_as::<_, EventModel>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        model.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, query: EventQuery) -> RepoResult<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1 OR status <> 'draft') AND ($2::uuid IS NULL OR id > $2) \
             ORDER BY id LIMIT $3"
        );
        let models = sqlx::query_as::<_, EventModel>(&sql)
            .bind(query.include_drafts)
            .bind(query.page.after.map(EventId::into_uuid))
            .bind(query.page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(Event::try_from).collect()
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: &Event) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO events (
                id, name, description, category, starts_at, ends_at, registration_deadline,
                venue, max_participants, registered_count, member_fee_cents, guest_fee_cents,
                currency, min_points, status, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ",
        )
        .bind(event.id.into_uuid())
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.category.as_str())
        .bind(event.schedule.starts_at)
        .bind(event.schedule.ends_at)
        .bind(event.schedule.registration_deadline)
        .bind(Json(&event.venue))
        .bind(event.capacity.max_participants)
        .bind(event.capacity.registered)
        .bind(event.fees.member_fee_cents)
        .bind(event.fees.guest_fee_cents)
        .bind(&event.fees.currency)
        .bind(event.eligibility.min_points.value())
        .bind(event.status.as_str())
        .bind(event.created_by.into_uuid())
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> RepoResult<Event> {
        let sql = format!(
            "UPDATE events \
             SET name = $2, description = $3, category = $4, starts_at = $5, ends_at = $6, \
                 registration_deadline = $7, venue = $8, max_participants = $9, \
                 member_fee_cents = $10, guest_fee_cents = $11, currency = $12, \
                 min_points = $13, updated_at = NOW() \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        let model = sqlx::query_as::<_, EventModel>(&sql)
            .bind(event.id.into_uuid())
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.category.as_str())
            .bind(event.schedule.starts_at)
            .bind(event.schedule.ends_at)
            .bind(event.schedule.registration_deadline)
            .bind(Json(&event.venue))
            .bind(event.capacity.max_participants)
            .bind(event.fees.member_fee_cents)
            .bind(event.fees.guest_fee_cents)
            .bind(&event.fees.currency)
            .bind(event.eligibility.min_points.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                // A concurrent registration took the seats the new limit needed
                let over_capacity = e
                    .as_database_error()
                    .is_some_and(|db| db.constraint() == Some("events_registered_within_capacity"));
                if over_capacity {
                    DomainError::invalid_field(
                        "max_participants",
                        "Capacity cannot be lower than the existing registrations",
                    )
                } else {
                    map_db_error(e)
                }
            })?
            .ok_or(DomainError::EventNotFound(event.id))?;

        Event::try_from(model)
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: EventId, from: EventStatus, to: EventStatus) -> RepoResult<Event> {
        if !from.can_transition_to(to) {
            return Err(DomainError::InvalidStatusTransition { from, to });
        }

        let sql = format!(
            "UPDATE events SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING {EVENT_COLUMNS}"
        );
        let model = sqlx::query_as::<_, EventModel>(&sql)
            .bind(id.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        if let Some(model) = model {
            return Event::try_from(model);
        }

        // Lost the race: report against whatever status is stored now
        let current = sqlx::query_scalar::<_, String>("SELECT status FROM events WHERE id = $1")
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or(DomainError::EventNotFound(id))?;
        let current: EventStatus = current.parse().map_err(DomainError::DatabaseError)?;
        Err(DomainError::InvalidStatusTransition { from: current, to })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EventId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(id));
        }

        Ok(())
    }
}
