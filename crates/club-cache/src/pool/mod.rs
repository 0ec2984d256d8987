//! Redis connection pool and readiness probe

mod health;
mod redis_pool;

pub use health::RedisHealthProbe;
pub use redis_pool::{RedisPool, RedisPoolError, RedisResult};
