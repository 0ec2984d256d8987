//! Authentication extractor
//!
//! Reads a bearer access token from the Authorization header. The role in
//! the token is informational; admin checks re-read the stored member.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use club_core::{MemberId, MemberRole};

use crate::response::ApiError;
use crate::state::AppState;

/// Member authenticated by a valid access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub member_id: MemberId,
    pub role: MemberRole,
}

fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state.jwt_service().validate_access_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Invalid access token");
        ApiError::InvalidToken
    })?;

    let member_id = claims.member_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid member id in token");
        ApiError::InvalidToken
    })?;

    Ok(AuthUser {
        member_id,
        role: claims.role,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        authenticate(&AppState::from_ref(state), bearer.token())
    }
}

/// Optional authenticated member
///
/// `None` without an Authorization header; a present but invalid token is
/// still rejected.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn member_id(&self) -> Option<MemberId> {
        self.0.map(|auth| auth.member_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let auth = authenticate(&AppState::from_ref(state), bearer.token())?;
                Ok(Self(Some(auth)))
            }
            Err(_) => Ok(Self(None)),
        }
    }
}
