//! Refresh token storage in Redis.
//!
//! Each live refresh token has a key holding its owner, and each member has
//! a set of their token ids so every session can be revoked at once.

use async_trait::async_trait;
use club_core::traits::{RepoResult, SessionStore};
use club_core::MemberId;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};

/// Key prefix for refresh tokens
const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";

/// Key prefix for a member's token set
const MEMBER_TOKENS_PREFIX: &str = "member_tokens:";

/// Stored session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub member_id: MemberId,
    /// Token creation timestamp (Unix epoch seconds)
    pub created_at: i64,
}

impl SessionData {
    #[must_use]
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Refresh token store for managing authentication sessions
#[derive(Clone, Debug)]
pub struct RedisSessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// `ttl_seconds` should match the refresh token lifetime
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token_id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token_id}")
    }

    fn member_key(member_id: MemberId) -> String {
        format!("{MEMBER_TOKENS_PREFIX}{member_id}")
    }

    async fn store_session(&self, token_id: &str, data: &SessionData) -> RedisResult<()> {
        self.pool
            .put_json(&Self::key(token_id), data, self.ttl_seconds)
            .await?;
        self.pool
            .add_to_set(&Self::member_key(data.member_id), token_id, self.ttl_seconds)
            .await?;

        tracing::debug!(member_id = %data.member_id, "Stored refresh token");
        Ok(())
    }

    async fn revoke_session(&self, token_id: &str) -> RedisResult<bool> {
        if let Some(data) = self.pool.get_json::<SessionData>(&Self::key(token_id)).await? {
            self.pool
                .remove_from_set(&Self::member_key(data.member_id), token_id)
                .await?;
        }

        let deleted = self.pool.remove(&Self::key(token_id)).await?;
        if deleted {
            tracing::debug!("Revoked refresh token");
        }
        Ok(deleted)
    }

    async fn revoke_member(&self, member_id: MemberId) -> RedisResult<u32> {
        let member_key = Self::member_key(member_id);
        let keys: Vec<String> = self
            .pool
            .set_members(&member_key)
            .await?
            .iter()
            .map(|id| Self::key(id))
            .collect();
        let removed = self.pool.remove_all(&keys).await?;
        self.pool.remove(&member_key).await?;

        tracing::info!(member_id = %member_id, count = removed, "Revoked all refresh tokens");
        Ok(u32::try_from(removed).unwrap_or(0))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn store(&self, token_id: &str, member_id: MemberId) -> RepoResult<()> {
        Ok(self
            .store_session(token_id, &SessionData::new(member_id))
            .await?)
    }

    async fn validate(&self, token_id: &str) -> RepoResult<Option<MemberId>> {
        let data = self
            .pool
            .get_json::<SessionData>(&Self::key(token_id))
            .await?;
        Ok(data.map(|d| d.member_id))
    }

    async fn revoke(&self, token_id: &str) -> RepoResult<bool> {
        Ok(self.revoke_session(token_id).await?)
    }

    async fn revoke_all(&self, member_id: MemberId) -> RepoResult<u32> {
        Ok(self.revoke_member(member_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        assert_eq!(RedisSessionStore::key("abc123"), "refresh_token:abc123");

        let member_id = MemberId::new();
        assert_eq!(
            RedisSessionStore::member_key(member_id),
            format!("member_tokens:{member_id}")
        );
    }

    #[test]
    fn test_session_data_round_trips_member() {
        let member_id = MemberId::new();
        let json = serde_json::to_string(&SessionData::new(member_id)).unwrap();
        let data: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(data.member_id, member_id);
    }
}
