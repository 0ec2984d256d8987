//! In-memory session and verification code stores, plus a scripted probe

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use club_common::VerificationConfig;
use club_core::traits::{CodeCheck, HealthProbe, IssuedCode, SessionStore, VerificationCodeStore};
use club_core::{DomainError, MemberId, RepoResult, VerificationChannel};
use parking_lot::Mutex;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, MemberId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_sessions(&self, member_id: MemberId) -> usize {
        self.sessions
            .lock()
            .values()
            .filter(|owner| **owner == member_id)
            .count()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn store(&self, token_id: &str, member_id: MemberId) -> RepoResult<()> {
        self.sessions.lock().insert(token_id.to_string(), member_id);
        Ok(())
    }

    async fn validate(&self, token_id: &str) -> RepoResult<Option<MemberId>> {
        Ok(self.sessions.lock().get(token_id).copied())
    }

    async fn revoke(&self, token_id: &str) -> RepoResult<bool> {
        Ok(self.sessions.lock().remove(token_id).is_some())
    }

    async fn revoke_all(&self, member_id: MemberId) -> RepoResult<u32> {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, owner| *owner != member_id);
        Ok(u32::try_from(before - sessions.len()).unwrap_or(u32::MAX))
    }
}

struct PendingCode {
    code: String,
    attempts: u32,
    issued_at: Instant,
}

/// Issues predictable sequential codes so tests can read them back
pub struct InMemoryCodeStore {
    config: VerificationConfig,
    next: AtomicU64,
    pending: Mutex<HashMap<(MemberId, VerificationChannel), PendingCode>>,
}

impl InMemoryCodeStore {
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            config,
            next: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// The live code for a member and channel, if any
    pub fn last_code(&self, member_id: MemberId, channel: VerificationChannel) -> Option<String> {
        self.pending
            .lock()
            .get(&(member_id, channel))
            .map(|p| p.code.clone())
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.code_ttl_seconds)
    }
}

#[async_trait]
impl VerificationCodeStore for InMemoryCodeStore {
    async fn issue(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
    ) -> RepoResult<IssuedCode> {
        let mut pending = self.pending.lock();
        let cooldown = Duration::from_secs(self.config.resend_cooldown_seconds);
        if let Some(previous) = pending.get(&(member_id, channel)) {
            let elapsed = previous.issued_at.elapsed();
            if elapsed < cooldown {
                return Err(DomainError::ResendCooldown {
                    retry_after_secs: (cooldown - elapsed).as_secs().max(1),
                });
            }
        }

        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let code = format!("{n:0width$}", width = self.config.code_length);
        pending.insert(
            (member_id, channel),
            PendingCode {
                code: code.clone(),
                attempts: 0,
                issued_at: Instant::now(),
            },
        );
        Ok(IssuedCode {
            code,
            expires_in_secs: self.config.code_ttl_seconds,
        })
    }

    async fn verify(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
        code: &str,
    ) -> RepoResult<CodeCheck> {
        let mut pending = self.pending.lock();
        let key = (member_id, channel);
        let Some(entry) = pending.get_mut(&key) else {
            return Ok(CodeCheck::Expired);
        };

        if entry.issued_at.elapsed() >= self.ttl() {
            pending.remove(&key);
            return Ok(CodeCheck::Expired);
        }
        if entry.code == code {
            pending.remove(&key);
            return Ok(CodeCheck::Matched);
        }

        entry.attempts += 1;
        if entry.attempts >= self.config.max_attempts {
            pending.remove(&key);
            return Ok(CodeCheck::AttemptsExhausted);
        }
        Ok(CodeCheck::Mismatch {
            remaining_attempts: self.config.max_attempts - entry.attempts,
        })
    }
}

/// Probe with a fixed answer
pub struct StaticProbe {
    name: &'static str,
    healthy: bool,
}

impl StaticProbe {
    pub fn healthy(name: &'static str) -> Self {
        Self {
            name,
            healthy: true,
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            healthy: false,
        }
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> RepoResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(DomainError::CacheError(format!("{} unreachable", self.name)))
        }
    }
}
