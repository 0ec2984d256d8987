//! Readiness probe for PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;

use club_core::traits::{HealthProbe, RepoResult};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgHealthProbe {
    pool: PgPool,
}

impl PgHealthProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for PgHealthProbe {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
