//! Server setup and initialization
//!
//! Wires PostgreSQL repositories and Redis stores into the service context,
//! builds the router and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use club_cache::{RedisHealthProbe, RedisPool, RedisSessionStore, RedisVerificationCodeStore};
use club_common::{AppConfig, AppError, JwtService};
use club_db::{
    create_pool, run_migrations, PgAchievementRepository, PgEventRepository, PgHealthProbe,
    PgMemberRepository, PgRegistrationRepository, DEFAULT_MIGRATIONS_DIR,
};
use club_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{api_layers, common_layers};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api = api_layers(create_router(), state.config());
    let health = common_layers(health_routes());

    api.merge(health).with_state(state)
}

/// Connect to every dependency and build the `AppState`
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, DEFAULT_MIGRATIONS_DIR)
            .await
            .map_err(|e| AppError::Database(format!("migration failed: {e}")))?;
    }

    info!("Connecting to Redis...");
    let redis = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    redis
        .health_check()
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis connection established");

    let session_ttl = u64::try_from(config.jwt.refresh_token_expiry)
        .map_err(|_| AppError::Config("JWT_REFRESH_TOKEN_EXPIRY must not be negative".to_string()))?;
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let service_context = ServiceContext::builder()
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .achievement_repo(Arc::new(PgAchievementRepository::new(pool.clone())))
        .event_repo(Arc::new(PgEventRepository::new(pool.clone())))
        .registration_repo(Arc::new(PgRegistrationRepository::new(pool.clone())))
        .session_store(Arc::new(RedisSessionStore::new(redis.clone(), session_ttl)))
        .verification_store(Arc::new(RedisVerificationCodeStore::new(
            redis.clone(),
            &config.verification,
        )))
        .health_probe(Arc::new(PgHealthProbe::new(pool)))
        .health_probe(Arc::new(RedisHealthProbe::new(redis)))
        .jwt_service(jwt_service)
        .verification_config(config.verification.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` until the process is stopped
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    run_server(create_app(state), addr).await
}
