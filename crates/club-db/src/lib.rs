//! # club-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `club-core`. It handles:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Row to entity mappers
//! - Repository implementations
//!
//! Award application and seat claims run inside a transaction that holds a
//! row lock on the member or event, so concurrent requests see each other's
//! effects.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use club_common::AppConfig;
//! use club_db::pool::{create_pool, run_migrations, DEFAULT_MIGRATIONS_DIR};
//! use club_db::repositories::PgMemberRepository;
//!
//! async fn example(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&config.database).await?;
//!     run_migrations(&pool, DEFAULT_MIGRATIONS_DIR).await?;
//!     let members = PgMemberRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, DEFAULT_MIGRATIONS_DIR};
pub use repositories::{
    PgAchievementRepository, PgEventRepository, PgHealthProbe, PgMemberRepository,
    PgRegistrationRepository,
};
