//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{achievements, admin, auth, cards, events, health, members, verification};
use crate::state::AppState;

/// API routes (health is kept separate so it can skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(member_routes())
        .merge(achievement_routes())
        .merge(admin_routes())
        .merge(event_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members/@me", get(members::get_me).patch(members::update_me))
        .route("/members/@me/score", get(members::get_score))
        .route("/members/@me/achievements", get(members::get_achievements))
        .route("/members/@me/achievements/check", post(members::recheck_achievements))
        .route("/members/@me/registrations", get(members::get_registrations))
        .route("/members/@me/verification/:channel", post(verification::issue_code))
        .route("/members/@me/verification/:channel/confirm", post(verification::confirm_code))
        .route("/members/@me/card", get(cards::get_my_card))
        .route("/members/@me/card/rotate", post(cards::rotate_card))
        .route("/members/by-username/:username", get(members::get_by_username))
        .route("/members/:member_id", get(members::get_member))
        .route("/cards/:card_code", get(cards::get_card))
}

fn achievement_routes() -> Router<AppState> {
    Router::new().route("/achievements/catalog", get(achievements::get_catalog))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/members", get(admin::list_members))
        .route(
            "/admin/members/:member_id",
            patch(admin::update_member).delete(admin::delete_member),
        )
        .route("/admin/members/:member_id/points", post(admin::adjust_points))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:event_id/publish", post(events::publish_event))
        .route("/events/:event_id/close", post(events::close_event))
        .route("/events/:event_id/eligibility", get(events::get_eligibility))
        .route(
            "/events/:event_id/registrations/@me",
            post(events::register).delete(events::cancel_registration),
        )
}
