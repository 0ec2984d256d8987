//! Virtual ID card handlers

use axum::{
    extract::{Path, State},
    Json,
};
use club_service::dto::VirtualCardResponse;
use club_service::CardService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /members/@me/card
pub async fn get_my_card(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<VirtualCardResponse>> {
    let service = CardService::new(state.service_context());
    Ok(Json(service.my_card(auth.member_id).await?))
}

/// POST /members/@me/card/rotate
pub async fn rotate_card(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<VirtualCardResponse>> {
    let service = CardService::new(state.service_context());
    Ok(Json(service.rotate(auth.member_id).await?))
}

/// GET /cards/:card_code
///
/// Public: the card is meant to be shown to anyone holding the code.
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_code): Path<String>,
) -> ApiResult<Json<VirtualCardResponse>> {
    let service = CardService::new(state.service_context());
    Ok(Json(service.by_code(&card_code).await?))
}
