//! Pagination extractor
//!
//! Keyset pagination: `?after=<id>&limit=<n>`. The cursor is the id of the
//! last item of the previous page.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use club_core::PageQuery;
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Raw cursor and limit; the cursor is parsed per resource
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    after: Option<String>,
    limit: Option<i64>,
}

impl Pagination {
    /// Parse the cursor as `Id` and clamp the limit
    pub fn page<Id: FromStr>(&self) -> Result<PageQuery<Id>, ApiError> {
        let after = self
            .after
            .as_deref()
            .map(|raw| {
                raw.parse::<Id>()
                    .map_err(|_| ApiError::invalid_query("Invalid 'after' cursor format"))
            })
            .transpose()?;
        Ok(PageQuery::new(after, self.limit))
    }
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self {
            after: params.after.filter(|s| !s.is_empty()),
            limit: params.limit,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(Self::from(params))
    }
}
