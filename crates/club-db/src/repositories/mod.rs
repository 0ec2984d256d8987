//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in club-core.
//! Each repository handles database operations for a specific domain entity.

mod achievement;
mod error;
mod event;
mod health;
mod member;
mod registration;

pub use achievement::PgAchievementRepository;
pub use event::PgEventRepository;
pub use health::PgHealthProbe;
pub use member::PgMemberRepository;
pub use registration::PgRegistrationRepository;
