//! Member handlers
//!
//! The caller's own profile, score, achievements and registrations, plus
//! public lookups of other members.

use axum::{
    extract::{Path, State},
    Json,
};
use club_service::dto::{
    AchievementResponse, MemberResponse, PublicMemberResponse, RegistrationResponse,
    ScoreCardResponse, UpdateProfileRequest,
};
use club_service::{AchievementService, EventService, MemberService};

use crate::extractors::{AuthUser, MemberIdPath, Parsed, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /members/@me
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.get_me(auth.member_id).await?))
}

/// PATCH /members/@me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.update_profile(auth.member_id, request).await?))
}

/// GET /members/:member_id
pub async fn get_member(
    State(state): State<AppState>,
    _auth: AuthUser,
    Parsed(member_id): MemberIdPath,
) -> ApiResult<Json<PublicMemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.get(member_id).await?))
}

/// GET /members/by-username/:username
pub async fn get_by_username(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<PublicMemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.get_by_username(&username).await?))
}

/// GET /members/@me/score
pub async fn get_score(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ScoreCardResponse>> {
    let service = AchievementService::new(state.service_context());
    Ok(Json(service.score_card(auth.member_id).await?))
}

/// GET /members/@me/achievements
pub async fn get_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<AchievementResponse>>> {
    let service = AchievementService::new(state.service_context());
    Ok(Json(service.records(auth.member_id).await?))
}

/// POST /members/@me/achievements/check
///
/// Returns only the records minted by this call.
pub async fn recheck_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<AchievementResponse>>> {
    let service = AchievementService::new(state.service_context());
    Ok(Json(service.recheck(auth.member_id).await?))
}

/// GET /members/@me/registrations
pub async fn get_registrations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RegistrationResponse>>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.my_registrations(auth.member_id).await?))
}
