//! Tower layers around the routers.
//!
//! Every route gets a request id, an `http_request` span and a 30 s timeout.
//! API routes also get CORS and the shared rate limiter; probes skip both so
//! an orchestrator is never throttled.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use club_common::{AppConfig, CorsConfig, RateLimitConfig};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn request_id() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %id,
    )
}

/// Request id, span and timeout
pub fn common_layers(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id(), MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(request_id()))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::with_status_code(StatusCode::SERVICE_UNAVAILABLE, REQUEST_TIMEOUT)),
    )
}

/// Common layers plus CORS, with the rate limiter outermost
pub fn api_layers(router: Router<AppState>, config: &AppConfig) -> Router<AppState> {
    let router = common_layers(router.layer(cors(&config.cors, config.app.env.is_production())));
    with_rate_limit(router, &config.rate_limit)
}

/// Milliseconds per replenished request; None turns the limiter off
fn replenish_period_ms(config: &RateLimitConfig) -> Option<u64> {
    if config.requests_per_second == 0 || config.burst == 0 {
        return None;
    }
    Some((1000 / u64::from(config.requests_per_second)).max(1))
}

fn with_rate_limit(router: Router<AppState>, config: &RateLimitConfig) -> Router<AppState> {
    let Some(replenish_ms) = replenish_period_ms(config) else {
        tracing::warn!("Rate limiter off: requests_per_second and burst must both be positive");
        return router;
    };

    let built = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish();
    match built {
        Some(governor) => router.layer(GovernorLayer {
            config: Arc::new(governor),
        }),
        None => {
            tracing::warn!(replenish_ms, burst = config.burst, "Rate limiter settings rejected");
            router
        }
    }
}

/// Configured origins, or any origin outside production when none are set
fn cors(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT, request_id()])
        .expose_headers([request_id(), header::RETRY_AFTER]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!("No CORS origins configured; cross-origin browser calls will fail");
            return layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Skipping unparsable CORS origin");
                None
            }
        })
        .collect();
    tracing::info!(count = origins.len(), "CORS origins loaded");
    layer.allow_origin(AllowOrigin::list(origins))
}
