//! PostgreSQL implementation of MemberRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use club_core::achievements::{plan_award, AwardOutcome, AwardTrigger};
use club_core::entities::{
    AchievementRecord, Member, MemberRole, MemberStatus, PhoneNumber, ProfileChanges,
};
use club_core::error::DomainError;
use club_core::traits::{MemberRepository, PageQuery, PointsAdjustment, RepoResult};
use club_core::value_objects::{AchievementId, MemberId, Points};

use crate::mappers::member_from_model;
use crate::models::{HeldAchievementModel, MemberModel, MEMBER_COLUMNS};

use super::error::{map_db_error, map_unique_violation, member_conflict};

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load a member row by an arbitrary predicate on `$1`
    async fn find_one<T>(&self, predicate: &str, value: T) -> RepoResult<Option<Member>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE {predicate}");
        let model = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match model {
            Some(model) => self.hydrate(model).await.map(Some),
            None => Ok(None),
        }
    }

    /// Attach owned achievement ids to a member row
    async fn hydrate(&self, model: MemberModel) -> RepoResult<Member> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        let held = load_held(&mut conn, model.id).await?;
        member_from_model(model, held_ids(&held))
    }
}

fn held_ids(held: &[HeldAchievementModel]) -> Vec<AchievementId> {
    held.iter().map(|h| AchievementId::from_uuid(h.id)).collect()
}

/// Records a member owns, in award order
async fn load_held(conn: &mut PgConnection, member_id: Uuid) -> RepoResult<Vec<HeldAchievementModel>> {
    sqlx::query_as::<_, HeldAchievementModel>(
        r"
        SELECT id, member_id, title
        FROM achievements
        WHERE member_id = $1
        ORDER BY awarded_at, id
        ",
    )
    .bind(member_id)
    .fetch_all(conn)
    .await
    .map_err(map_db_error)
}

async fn insert_record(conn: &mut PgConnection, record: &AchievementRecord) -> RepoResult<bool> {
    let result = sqlx::query(
        r"
        INSERT INTO achievements (id, member_id, title, description, icon, points, awarded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (member_id, title) DO NOTHING
        ",
    )
    .bind(record.id.into_uuid())
    .bind(record.member_id.into_uuid())
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.icon)
    .bind(record.points.value())
    .bind(record.awarded_at)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.rows_affected() == 1)
}

/// Lock a member row for the rest of the transaction, returning the member
/// and the titles it holds
async fn lock_member(conn: &mut PgConnection, id: MemberId) -> RepoResult<(Member, Vec<String>)> {
    let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1 FOR UPDATE");
    let model = sqlx::query_as::<_, MemberModel>(&sql)
        .bind(id.into_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::MemberNotFound(id))?;

    let held = load_held(conn, model.id).await?;
    let titles = held.iter().map(|h| h.title.clone()).collect();
    let member = member_from_model(model, held_ids(&held))?;
    Ok((member, titles))
}

/// Plan and apply a trigger against a member the caller has locked
async fn award_locked(
    conn: &mut PgConnection,
    mut member: Member,
    titles: &[String],
    trigger: AwardTrigger,
) -> RepoResult<AwardOutcome> {
    let opening = member.points;
    let plan = plan_award(trigger, &member, titles)?;
    if plan.is_empty() {
        return Ok(AwardOutcome {
            member,
            minted: Vec::new(),
            credited: Points::ZERO,
        });
    }

    plan.apply_flags(&mut member);

    let mut minted = Vec::with_capacity(plan.grants.len());
    for definition in &plan.grants {
        let record = AchievementRecord::mint(member.id, definition);
        if insert_record(&mut *conn, &record).await? {
            member.record_achievement(&record);
            minted.push(record);
        } else {
            debug!(title = definition.title, "Achievement already held, skipping");
        }
    }

    sqlx::query(
        r"
        UPDATE members
        SET email_verified = $2, phone_verified = $3, profile_bonus_credited = $4,
            points = $5, updated_at = $6
        WHERE id = $1
        ",
    )
    .bind(member.id.into_uuid())
    .bind(member.email_verified)
    .bind(member.phone_verified)
    .bind(member.profile_bonus_credited)
    .bind(member.points.value())
    .bind(member.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    let credited = Points::new(member.points.value() - opening.value());
    Ok(AwardOutcome {
        member,
        minted,
        credited,
    })
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        self.find_one("id = $1", id.into_uuid()).await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        self.find_one("LOWER(username) = LOWER($1)", username.to_string())
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        self.find_one("LOWER(email) = LOWER($1)", email.to_string())
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_card_code(&self, code: &str) -> RepoResult<Option<Member>> {
        self.find_one("card_code = $1", code.to_string()).await
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(username) = LOWER($1))
            ",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1))
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn phone_exists(&self, phone: &PhoneNumber) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM members WHERE phone_country_code = $1 AND phone_number = $2
            )
            ",
        )
        .bind(&phone.country_code)
        .bind(&phone.number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list(&self, page: PageQuery<MemberId>) -> RepoResult<Vec<Member>> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members \
             WHERE ($1::uuid IS NULL OR id > $1) ORDER BY id LIMIT $2"
        );
        let models = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(page.after.map(MemberId::into_uuid))
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let member_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let held = sqlx::query_as::<_, HeldAchievementModel>(
            r"
            SELECT id, member_id, title
            FROM achievements
            WHERE member_id = ANY($1)
            ORDER BY awarded_at, id
            ",
        )
        .bind(&member_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut by_member: HashMap<Uuid, Vec<AchievementId>> = HashMap::new();
        for h in held {
            by_member
                .entry(h.member_id)
                .or_default()
                .push(AchievementId::from_uuid(h.id));
        }

        models
            .into_iter()
            .map(|model| {
                let ids = by_member.remove(&model.id).unwrap_or_default();
                member_from_model(model, ids)
            })
            .collect()
    }

    #[instrument(skip(self, member, password_hash, achievements), fields(member_id = %member.id))]
    async fn create(
        &self,
        member: &Member,
        password_hash: &str,
        achievements: &[AchievementRecord],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO members (
                id, username, email, phone_country_code, phone_number, password_hash,
                first_name, last_name, address, date_of_birth, experience,
                email_verified, phone_verified, profile_bonus_credited, points,
                role, status, card_code, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            ",
        )
        .bind(member.id.into_uuid())
        .bind(&member.username)
        .bind(&member.email)
        .bind(&member.phone.country_code)
        .bind(&member.phone.number)
        .bind(password_hash)
        .bind(&member.profile.first_name)
        .bind(&member.profile.last_name)
        .bind(&member.profile.address)
        .bind(member.profile.date_of_birth)
        .bind(&member.profile.experience)
        .bind(member.email_verified)
        .bind(member.phone_verified)
        .bind(member.profile_bonus_credited)
        .bind(member.points.value())
        .bind(member.role.as_str())
        .bind(member.status.as_str())
        .bind(&member.card_code)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, member_conflict))?;

        for record in achievements {
            if !insert_record(&mut *tx, record).await? {
                return Err(DomainError::DuplicateAchievement(record.title.clone()));
            }
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(
        &self,
        id: MemberId,
        changes: &ProfileChanges,
    ) -> RepoResult<AwardOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let (mut member, titles) = lock_member(&mut tx, id).await?;

        changes.apply(&mut member.profile)?;
        member.touch();

        sqlx::query(
            r"
            UPDATE members
            SET first_name = $2, last_name = $3, address = $4, date_of_birth = $5,
                experience = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(id.into_uuid())
        .bind(&member.profile.first_name)
        .bind(&member.profile.last_name)
        .bind(&member.profile.address)
        .bind(member.profile.date_of_birth)
        .bind(&member.profile.experience)
        .bind(member.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let outcome = award_locked(&mut tx, member, &titles, AwardTrigger::ProfileUpdated).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn set_role_status(
        &self,
        id: MemberId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> RepoResult<Member> {
        let sql = format!(
            "UPDATE members \
             SET role = COALESCE($2, role), status = COALESCE($3, status), updated_at = NOW() \
             WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
        );
        let model = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(id.into_uuid())
            .bind(role.map(MemberRole::as_str))
            .bind(status.map(MemberStatus::as_str))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or(DomainError::MemberNotFound(id))?;

        self.hydrate(model).await
    }

    #[instrument(skip(self, code))]
    async fn set_card_code(&self, id: MemberId, code: &str) -> RepoResult<Member> {
        let sql = format!(
            "UPDATE members SET card_code = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
        );
        let model = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(id.into_uuid())
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, member_conflict))?
            .ok_or(DomainError::MemberNotFound(id))?;

        self.hydrate(model).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: MemberId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Seats held by this member are released before the cascade drops them
        sqlx::query(
            r"
            UPDATE events
            SET registered_count = GREATEST(registered_count - 1, 0), updated_at = NOW()
            WHERE id IN (SELECT event_id FROM event_registrations WHERE member_id = $1)
            ",
        )
        .bind(id.into_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: MemberId) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM members WHERE id = $1")
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn apply_award(&self, id: MemberId, trigger: AwardTrigger) -> RepoResult<AwardOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let (member, titles) = lock_member(&mut tx, id).await?;
        let outcome = award_locked(&mut tx, member, &titles, trigger).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn adjust_points(&self, id: MemberId, delta: i64) -> RepoResult<PointsAdjustment> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let previous = sqlx::query_scalar::<_, i64>("SELECT points FROM members WHERE id = $1 FOR UPDATE")
            .bind(id.into_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or(DomainError::MemberNotFound(id))?;

        let sql = format!(
            "UPDATE members SET points = GREATEST(points + $2, 0), updated_at = NOW() \
             WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
        );
        let model = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(id.into_uuid())
            .bind(delta)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let held = load_held(&mut tx, model.id).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(PointsAdjustment {
            member: member_from_model(model, held_ids(&held))?,
            previous: Points::new(previous),
        })
    }
}
