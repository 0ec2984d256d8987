//! Path parameter extractors
//!
//! Parse ids and channel names out of the URL, rejecting malformed values
//! with a 400 before a handler runs.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use club_core::{EventId, MemberId, VerificationChannel};

use crate::response::ApiError;

/// A single path segment parsed as `T`
#[derive(Debug, Clone, Copy)]
pub struct Parsed<T>(pub T);

/// Name used in the error message for a rejected segment
pub trait PathParam: FromStr {
    const NAME: &'static str;
}

impl PathParam for MemberId {
    const NAME: &'static str = "member_id";
}

impl PathParam for EventId {
    const NAME: &'static str = "event_id";
}

impl PathParam for VerificationChannel {
    const NAME: &'static str = "channel";
}

#[async_trait]
impl<S, T> FromRequestParts<S> for Parsed<T>
where
    S: Send + Sync,
    T: PathParam + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.parse::<T>()
            .map(Parsed)
            .map_err(|_| ApiError::invalid_path(format!("Invalid {} format", T::NAME)))
    }
}

pub type MemberIdPath = Parsed<MemberId>;
pub type EventIdPath = Parsed<EventId>;
pub type ChannelPath = Parsed<VerificationChannel>;
