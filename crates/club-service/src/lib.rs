//! # club-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use services::{
    AchievementService, AuthService, CardService, EventListFilter, EventService, HealthService,
    MemberService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    VerificationService,
};
