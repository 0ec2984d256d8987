//! Readiness probe for Redis

use async_trait::async_trait;
use club_core::traits::{HealthProbe, RepoResult};

use super::RedisPool;

#[derive(Clone, Debug)]
pub struct RedisHealthProbe {
    pool: RedisPool,
}

impl RedisHealthProbe {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for RedisHealthProbe {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> RepoResult<()> {
        self.pool.health_check().await?;
        Ok(())
    }
}
