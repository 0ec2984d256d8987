//! Email and phone verification

use axum::{extract::State, Json};
use club_service::dto::{ConfirmVerificationRequest, VerificationIssuedResponse, VerificationResultResponse};
use club_service::VerificationService;

use crate::extractors::{AuthUser, ChannelPath, Parsed, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /members/@me/verification/:channel
pub async fn issue_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(channel): ChannelPath,
) -> ApiResult<Created<Json<VerificationIssuedResponse>>> {
    let service = VerificationService::new(state.service_context());
    Ok(Created(Json(service.issue(auth.member_id, channel).await?)))
}

/// POST /members/@me/verification/:channel/confirm
pub async fn confirm_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(channel): ChannelPath,
    ValidatedJson(request): ValidatedJson<ConfirmVerificationRequest>,
) -> ApiResult<Json<VerificationResultResponse>> {
    let service = VerificationService::new(state.service_context());
    Ok(Json(service.confirm(auth.member_id, channel, request).await?))
}
