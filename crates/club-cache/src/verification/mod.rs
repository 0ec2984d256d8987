//! One-time verification codes in Redis
//!
//! Per member and channel there are three keys: the live code, a counter of
//! wrong guesses, and a cooldown marker that throttles re-issuing.

use async_trait::async_trait;
use club_common::VerificationConfig;
use club_core::entities::VerificationChannel;
use club_core::error::DomainError;
use club_core::traits::{CodeCheck, IssuedCode, RepoResult, VerificationCodeStore};
use club_core::MemberId;
use rand::Rng;

use crate::pool::{RedisPool, RedisResult};

const CODE_PREFIX: &str = "verify:code:";
const ATTEMPTS_PREFIX: &str = "verify:attempts:";
const COOLDOWN_PREFIX: &str = "verify:cooldown:";

fn suffix(member_id: MemberId, channel: VerificationChannel) -> String {
    format!("{member_id}:{}", channel.as_str())
}

/// Random decimal code of `length` digits; leading zeros allowed
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Compare without short-circuiting on the first differing byte
fn codes_match(expected: &str, submitted: &str) -> bool {
    let (a, b) = (expected.as_bytes(), submitted.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Classify a wrong guess given how many have been made so far
fn after_mismatch(attempts: i64, max_attempts: u32) -> CodeCheck {
    let used = u32::try_from(attempts.max(0)).unwrap_or(u32::MAX);
    if used >= max_attempts {
        CodeCheck::AttemptsExhausted
    } else {
        CodeCheck::Mismatch {
            remaining_attempts: max_attempts - used,
        }
    }
}

/// Redis-backed [`VerificationCodeStore`]
#[derive(Clone, Debug)]
pub struct RedisVerificationCodeStore {
    pool: RedisPool,
    code_length: usize,
    ttl_seconds: u64,
    max_attempts: u32,
    cooldown_seconds: u64,
}

impl RedisVerificationCodeStore {
    #[must_use]
    pub fn new(pool: RedisPool, config: &VerificationConfig) -> Self {
        Self {
            pool,
            code_length: config.code_length,
            ttl_seconds: config.code_ttl_seconds,
            max_attempts: config.max_attempts,
            cooldown_seconds: config.resend_cooldown_seconds,
        }
    }

    async fn issue_code(&self, key: &str) -> RedisResult<Result<IssuedCode, u64>> {
        let cooldown_key = format!("{COOLDOWN_PREFIX}{key}");
        if self.cooldown_seconds > 0 && !self.pool.claim(&cooldown_key, self.cooldown_seconds).await? {
            let retry_after = self
                .pool
                .seconds_left(&cooldown_key)
                .await?
                .unwrap_or(self.cooldown_seconds);
            return Ok(Err(retry_after));
        }

        let code = generate_code(self.code_length);
        self.pool
            .put_json(&format!("{CODE_PREFIX}{key}"), &code, self.ttl_seconds)
            .await?;
        self.pool.remove(&format!("{ATTEMPTS_PREFIX}{key}")).await?;

        Ok(Ok(IssuedCode {
            code,
            expires_in_secs: self.ttl_seconds,
        }))
    }

    async fn check_code(&self, key: &str, submitted: &str) -> RedisResult<CodeCheck> {
        let code_key = format!("{CODE_PREFIX}{key}");
        let attempts_key = format!("{ATTEMPTS_PREFIX}{key}");

        let Some(expected) = self.pool.get_json::<String>(&code_key).await? else {
            return Ok(CodeCheck::Expired);
        };

        if codes_match(&expected, submitted) {
            self.pool.remove_all(&[code_key, attempts_key]).await?;
            return Ok(CodeCheck::Matched);
        }

        let attempts = self.pool.bump(&attempts_key, self.ttl_seconds).await?;
        let check = after_mismatch(attempts, self.max_attempts);
        if check == CodeCheck::AttemptsExhausted {
            self.pool.remove_all(&[code_key, attempts_key]).await?;
        }
        Ok(check)
    }
}

#[async_trait]
impl VerificationCodeStore for RedisVerificationCodeStore {
    async fn issue(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
    ) -> RepoResult<IssuedCode> {
        match self.issue_code(&suffix(member_id, channel)).await? {
            Ok(issued) => {
                tracing::debug!(
                    member_id = %member_id,
                    channel = channel.as_str(),
                    ttl_secs = issued.expires_in_secs,
                    "Issued verification code"
                );
                Ok(issued)
            }
            Err(retry_after_secs) => Err(DomainError::ResendCooldown { retry_after_secs }),
        }
    }

    async fn verify(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
        code: &str,
    ) -> RepoResult<CodeCheck> {
        Ok(self.check_code(&suffix(member_id, channel), code).await?)
    }
}
