//! Postgres pool and schema migrations.

use std::path::Path;
use std::time::Duration;

use club_common::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// `migrations/` inside this crate
pub const DEFAULT_MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
}

/// Connect eagerly so a bad URL fails at startup rather than on first query
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let connect: PgConnectOptions = config.url.parse()?;
    let target = format!("{}:{}/{}", connect.get_host(), connect.get_port(), connect.get_database().unwrap_or("-"));
    let pool = pool_options(config).connect_with(connect).await?;

    tracing::info!(
        %target,
        max_connections = config.max_connections,
        "Postgres pool ready"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool, dir: impl AsRef<Path>) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir.as_ref()).await?;
    migrator.run(pool).await?;
    tracing::info!(known = migrator.iter().count(), "Migrations up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: u32, max: u32) -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://db/club".to_string(),
            max_connections: max,
            min_connections: min,
            run_migrations: false,
        }
    }

    #[test]
    fn test_min_never_exceeds_max() {
        let options = pool_options(&config(50, 8));
        assert_eq!(options.get_max_connections(), 8);
        assert_eq!(options.get_min_connections(), 8);
    }

    #[test]
    fn test_timeouts_applied() {
        let options = pool_options(&config(1, 10));
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
        assert_eq!(options.get_idle_timeout(), Some(IDLE_TIMEOUT));
    }

    #[test]
    fn test_migrations_dir_points_into_crate() {
        assert!(Path::new(DEFAULT_MIGRATIONS_DIR).join("0001_init.sql").exists());
    }
}
