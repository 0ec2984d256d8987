//! Achievement catalog

use axum::{extract::State, Json};
use club_service::dto::CatalogEntryResponse;
use club_service::AchievementService;

use crate::state::AppState;

/// GET /achievements/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<Vec<CatalogEntryResponse>> {
    Json(AchievementService::new(state.service_context()).catalog())
}
