//! # club-cache
//!
//! Redis layer for short-lived state.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Sessions**: Refresh-token sessions with per-member revocation
//! - **Verification Codes**: Expiring one-time codes with attempt limits and a resend cooldown
//!
//! ## Example
//!
//! ```ignore
//! use club_cache::{RedisPool, RedisSessionStore, RedisVerificationCodeStore};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let sessions = RedisSessionStore::new(pool.clone(), 604_800);
//! let codes = RedisVerificationCodeStore::new(pool.clone(), &config.verification);
//!
//! let issued = codes.issue(member_id, VerificationChannel::Email).await?;
//! ```

pub mod pool;
pub mod session;
pub mod verification;

pub use pool::{RedisHealthProbe, RedisPool, RedisPoolError, RedisResult};

pub use session::{RedisSessionStore, SessionData};
pub use verification::RedisVerificationCodeStore;
