//! Administrative member management
//!
//! Every handler here requires the stored role to be admin; the service
//! layer enforces it.

use axum::{extract::State, Json};
use club_core::MemberId;
use club_service::dto::{
    AdjustPointsRequest, AdminUpdateMemberRequest, MemberResponse, PageResponse,
    PointsAdjustedResponse,
};
use club_service::MemberService;

use crate::extractors::{AuthUser, MemberIdPath, Pagination, Parsed, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /admin/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<PageResponse<MemberResponse>>> {
    let page = pagination.page::<MemberId>()?;
    let service = MemberService::new(state.service_context());
    Ok(Json(service.list(auth.member_id, page).await?))
}

/// PATCH /admin/members/:member_id
pub async fn update_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(member_id): MemberIdPath,
    ValidatedJson(request): ValidatedJson<AdminUpdateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.admin_update(auth.member_id, member_id, request).await?))
}

/// DELETE /admin/members/:member_id
pub async fn delete_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(member_id): MemberIdPath,
) -> ApiResult<NoContent> {
    let service = MemberService::new(state.service_context());
    service.delete(auth.member_id, member_id).await?;
    Ok(NoContent)
}

/// POST /admin/members/:member_id/points
pub async fn adjust_points(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(member_id): MemberIdPath,
    ValidatedJson(request): ValidatedJson<AdjustPointsRequest>,
) -> ApiResult<Json<PointsAdjustedResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.adjust_points(auth.member_id, member_id, request).await?))
}
