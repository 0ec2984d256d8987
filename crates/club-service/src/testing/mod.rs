//! In-memory doubles for every port, and a harness that wires them into a
//! [`ServiceContext`]. Enabled for this crate's tests and, through the
//! `test-support` feature, for downstream crates.

mod store;
mod stores;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

use club_common::auth::JwtService;
use club_common::{hash_password, VerificationConfig};
use club_core::traits::HealthProbe;
use club_core::{plan_registration, Member, MemberId, MemberProfile, MemberRole, PhoneNumber};

use crate::services::ServiceContext;

pub use store::InMemoryStore;
pub use stores::{InMemoryCodeStore, InMemorySessionStore, StaticProbe};

/// Password every seeded member logs in with
pub const TEST_PASSWORD: &str = "Sup3rSecret";

const TEST_JWT_SECRET: &str = "test-secret-key-that-is-long-enough";

fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).unwrap_or_default())
        .clone()
}

pub struct TestHarness {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub codes: Arc<InMemoryCodeStore>,
    seeded: AtomicU32,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::build(VerificationConfig::default(), Vec::new())
    }

    pub fn with_verification(config: VerificationConfig) -> Self {
        Self::build(config, Vec::new())
    }

    pub fn with_probes(probes: Vec<Arc<dyn HealthProbe>>) -> Self {
        Self::build(VerificationConfig::default(), probes)
    }

    fn build(verification: VerificationConfig, probes: Vec<Arc<dyn HealthProbe>>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let codes = Arc::new(InMemoryCodeStore::new(verification.clone()));

        let mut builder = ServiceContext::builder()
            .member_repo(store.clone())
            .achievement_repo(store.clone())
            .event_repo(store.clone())
            .registration_repo(store.clone())
            .session_store(sessions.clone())
            .verification_store(codes.clone())
            .jwt_service(Arc::new(JwtService::new(TEST_JWT_SECRET, 900, 604_800)))
            .verification_config(verification);
        for probe in probes {
            builder = builder.health_probe(probe);
        }

        let ctx = match builder.build() {
            Ok(ctx) => ctx,
            Err(e) => panic!("test context is fully wired: {e}"),
        };

        Self {
            ctx,
            store,
            sessions,
            codes,
            seeded: AtomicU32::new(0),
        }
    }

    /// Seed an active member with the opening Welcome balance and an
    /// incomplete profile
    pub fn member(&self, username: &str) -> MemberId {
        self.seed(username, MemberRole::User)
    }

    pub fn admin(&self, username: &str) -> MemberId {
        self.seed(username, MemberRole::Admin)
    }

    fn seed(&self, username: &str, role: MemberRole) -> MemberId {
        let n = self.seeded.fetch_add(1, Ordering::Relaxed);
        let mut member = Member::new(
            MemberId::new(),
            username.to_string(),
            format!("{username}@example.com"),
            PhoneNumber::new("82", format!("10{n:08}")),
            MemberProfile {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..MemberProfile::default()
            },
        );
        member.role = role;
        let records = plan_registration(&member).apply(&mut member);

        match self.store.seed(member, test_password_hash(), records) {
            Ok(id) => id,
            Err(e) => panic!("seeding {username} failed: {e}"),
        }
    }
}
