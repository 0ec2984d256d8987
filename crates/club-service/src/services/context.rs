//! Service context - dependency container for services
//!
//! Holds every repository, store and shared service the use cases need.
//! Everything is behind a trait object so the API can be wired against
//! PostgreSQL and Redis in production and in-memory doubles in tests.

use std::sync::Arc;

use club_common::auth::JwtService;
use club_common::VerificationConfig;
use club_core::traits::{
    AchievementRepository, EventRepository, HealthProbe, MemberRepository,
    RegistrationRepository, SessionStore, VerificationCodeStore,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    achievement_repo: Arc<dyn AchievementRepository>,
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,

    // Short-lived state
    session_store: Arc<dyn SessionStore>,
    verification_store: Arc<dyn VerificationCodeStore>,

    // Readiness
    health_probes: Vec<Arc<dyn HealthProbe>>,

    // Services
    jwt_service: Arc<JwtService>,
    verification: VerificationConfig,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn achievement_repo(&self) -> &dyn AchievementRepository {
        self.achievement_repo.as_ref()
    }

    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    pub fn registration_repo(&self) -> &dyn RegistrationRepository {
        self.registration_repo.as_ref()
    }

    // === Stores ===

    /// Refresh-token sessions
    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    /// One-time verification codes
    pub fn verification_store(&self) -> &dyn VerificationCodeStore {
        self.verification_store.as_ref()
    }

    /// Dependencies pinged by the readiness check
    pub fn health_probes(&self) -> &[Arc<dyn HealthProbe>] {
        &self.health_probes
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn verification_config(&self) -> &VerificationConfig {
        &self.verification
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("stores", &"...")
            .field("health_probes", &self.health_probes.len())
            .field("verification", &self.verification)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    achievement_repo: Option<Arc<dyn AchievementRepository>>,
    event_repo: Option<Arc<dyn EventRepository>>,
    registration_repo: Option<Arc<dyn RegistrationRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    verification_store: Option<Arc<dyn VerificationCodeStore>>,
    health_probes: Vec<Arc<dyn HealthProbe>>,
    jwt_service: Option<Arc<JwtService>>,
    verification: Option<VerificationConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn achievement_repo(mut self, repo: Arc<dyn AchievementRepository>) -> Self {
        self.achievement_repo = Some(repo);
        self
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn registration_repo(mut self, repo: Arc<dyn RegistrationRepository>) -> Self {
        self.registration_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn verification_store(mut self, store: Arc<dyn VerificationCodeStore>) -> Self {
        self.verification_store = Some(store);
        self
    }

    /// Add a dependency to the readiness check
    pub fn health_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.health_probes.push(probe);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Verification settings; defaults apply when unset
    pub fn verification_config(mut self, config: VerificationConfig) -> Self {
        self.verification = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &'static str) -> ServiceResult<T> {
            value.ok_or(ServiceError::MissingDependency(name))
        }

        Ok(ServiceContext {
            member_repo: required(self.member_repo, "member_repo")?,
            achievement_repo: required(self.achievement_repo, "achievement_repo")?,
            event_repo: required(self.event_repo, "event_repo")?,
            registration_repo: required(self.registration_repo, "registration_repo")?,
            session_store: required(self.session_store, "session_store")?,
            verification_store: required(self.verification_store, "verification_store")?,
            health_probes: self.health_probes,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            verification: self.verification.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_names_first_missing_dependency() {
        match ServiceContext::builder().build() {
            Err(ServiceError::MissingDependency(name)) => assert_eq!(name, "member_repo"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("empty builder should not build"),
        }
    }
}
