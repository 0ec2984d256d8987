//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

mod access;
pub mod achievement;
pub mod auth;
pub mod card;
pub mod context;
pub mod error;
pub mod event;
pub mod health;
pub mod member;
pub mod verification;

// Re-export all services for convenience
pub use achievement::AchievementService;
pub use auth::AuthService;
pub use card::CardService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use event::{EventListFilter, EventService};
pub use health::HealthService;
pub use member::MemberService;
pub use verification::VerificationService;
