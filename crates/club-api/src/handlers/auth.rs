//! `/auth`: sign-up, sign-in and session rotation.

use axum::{extract::State, Json};
use club_service::dto::{AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};
use club_service::AuthService;

use crate::extractors::{AuthUser, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(state.service_context())
}

/// POST /auth/register. Creates the member, awards Welcome and signs them in.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let session = auth_service(&state).register(request).await?;
    Ok(Created(Json(session)))
}

/// POST /auth/login. `login` may be a username or an email.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(auth_service(&state).login(request).await?))
}

/// POST /auth/refresh. The presented refresh token is spent.
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(auth_service(&state).refresh_tokens(request).await?))
}

/// POST /auth/logout
///
/// A refresh token in the body ends that session only. No body ends all of
/// the member's sessions.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(body): OptionalValidatedJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    let refresh_token = body.and_then(|b| b.refresh_token);
    auth_service(&state).logout(auth.member_id, refresh_token).await?;
    Ok(NoContent)
}
