//! PostgreSQL implementation of RegistrationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use club_core::entities::{Event, EventRegistration, Member};
use club_core::error::DomainError;
use club_core::lifecycle::ensure_can_register;
use club_core::traits::{RegistrationRepository, RepoResult};
use club_core::value_objects::{EventId, MemberId};

use crate::models::{EventModel, RegistrationModel, EVENT_COLUMNS};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RegistrationRepository
#[derive(Clone)]
pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn register(
        &self,
        event_id: EventId,
        member: &Member,
        now: DateTime<Utc>,
    ) -> RepoResult<EventRegistration> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes seat claims on this event
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
        let event = sqlx::query_as::<_, EventModel>(&sql)
            .bind(event_id.into_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or(DomainError::EventNotFound(event_id))
            .and_then(Event::try_from)?;

        let already = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM event_registrations WHERE event_id = $1 AND member_id = $2
            )
            ",
        )
        .bind(event_id.into_uuid())
        .bind(member.id.into_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if already {
            return Err(DomainError::AlreadyRegistered);
        }

        ensure_can_register(member, &event, now)?;

        let registration = EventRegistration::new(event_id, member.id);
        sqlx::query(
            r"
            INSERT INTO event_registrations (id, event_id, member_id, registered_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(registration.id.into_uuid())
        .bind(registration.event_id.into_uuid())
        .bind(registration.member_id.into_uuid())
        .bind(registration.registered_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::AlreadyRegistered))?;

        sqlx::query(
            r"
            UPDATE events
            SET registered_count = registered_count + 1, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(event_id.into_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(event_id = %event_id, "Seat claimed");
        Ok(registration)
    }

    #[instrument(skip(self))]
    async fn cancel(&self, event_id: EventId, member_id: MemberId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            "DELETE FROM event_registrations WHERE event_id = $1 AND member_id = $2",
        )
        .bind(event_id.into_uuid())
        .bind(member_id.into_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RegistrationNotFound);
        }

        sqlx::query(
            r"
            UPDATE events
            SET registered_count = GREATEST(registered_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(event_id.into_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        event_id: EventId,
        member_id: MemberId,
    ) -> RepoResult<Option<EventRegistration>> {
        let row = sqlx::query_as::<_, RegistrationModel>(
            r"
            SELECT id, event_id, member_id, registered_at
            FROM event_registrations
            WHERE event_id = $1 AND member_id = $2
            ",
        )
        .bind(event_id.into_uuid())
        .bind(member_id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(EventRegistration::from))
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<EventRegistration>> {
        let rows = sqlx::query_as::<_, RegistrationModel>(
            r"
            SELECT id, event_id, member_id, registered_at
            FROM event_registrations
            WHERE member_id = $1
            ORDER BY registered_at, id
            ",
        )
        .bind(member_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(EventRegistration::from).collect())
    }
}
