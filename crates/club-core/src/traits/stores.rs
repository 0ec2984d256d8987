//! Ports for short-lived state kept outside the relational store

use async_trait::async_trait;

use crate::entities::VerificationChannel;
use crate::traits::RepoResult;
use crate::value_objects::MemberId;

/// A freshly issued one-time code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub code: String,
    pub expires_in_secs: u64,
}

/// Outcome of checking a submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code matched and has been consumed
    Matched,
    Mismatch { remaining_attempts: u32 },
    /// No live code for this member and channel
    Expired,
    /// Too many wrong guesses; the code has been discarded
    AttemptsExhausted,
}

/// Time-boxed, single-use verification codes
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Issue a new code, replacing any previous one. Fails with
    /// `ResendCooldown` if a code was issued too recently.
    async fn issue(&self, member_id: MemberId, channel: VerificationChannel)
        -> RepoResult<IssuedCode>;

    /// Check a code, consuming it on a match
    async fn verify(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
        code: &str,
    ) -> RepoResult<CodeCheck>;
}

/// Refresh-token sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store(&self, token_id: &str, member_id: MemberId) -> RepoResult<()>;

    /// Owner of a live token
    async fn validate(&self, token_id: &str) -> RepoResult<Option<MemberId>>;

    async fn revoke(&self, token_id: &str) -> RepoResult<bool>;

    /// Revoke every session of a member, returning how many were removed
    async fn revoke_all(&self, member_id: MemberId) -> RepoResult<u32>;
}

/// A dependency that readiness checks can ping
#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> RepoResult<()>;
}
