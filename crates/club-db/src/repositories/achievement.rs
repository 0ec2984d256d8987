//! PostgreSQL implementation of AchievementRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use club_core::entities::AchievementRecord;
use club_core::traits::{AchievementRepository, RepoResult};
use club_core::value_objects::MemberId;

use crate::models::AchievementModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgAchievementRepository {
    pool: PgPool,
}

impl PgAchievementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AchievementRepository for PgAchievementRepository {
    #[instrument(skip(self))]
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<AchievementRecord>> {
        let rows = sqlx::query_as::<_, AchievementModel>(
            r"
            SELECT id, member_id, title, description, icon, points, awarded_at
            FROM achievements
            WHERE member_id = $1
            ORDER BY awarded_at, id
            ",
        )
        .bind(member_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(AchievementRecord::from).collect())
    }
}
