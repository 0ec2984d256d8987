//! JSON bodies checked with `validator` before a handler sees them.
//!
//! Malformed JSON is `INVALID_BODY`; JSON that parses but breaks a rule is
//! `VALIDATION_ERROR` with the first offending field named.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_LENGTH,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

async fn parse<S, T>(req: Request, state: &S) -> Result<T, ApiError>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    let Json(body) = Json::<T>::from_request(req, state)
        .await
        .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;
    body.validate()?;
    Ok(body)
}

#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        parse(req, state).await.map(Self)
    }
}

/// Body that may be left out entirely
///
/// Only a declared zero length (or no length) counts as absent. A body that
/// is present but malformed is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalValidatedJson<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let declared_len = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        if declared_len == 0 {
            return Ok(Self(None));
        }
        parse(req, state).await.map(|body| Self(Some(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 3))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(probe) = ValidatedJson::<Probe>::from_request(json_request(r#"{"name":"chess"}"#), &())
            .await
            .unwrap();
        assert_eq!(probe.name, "chess");
    }

    #[tokio::test]
    async fn test_rule_violation_names_field() {
        let err = ValidatedJson::<Probe>::from_request(json_request(r#"{"name":"x"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.field().as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_body() {
        let err = ValidatedJson::<Probe>::from_request(json_request("{"), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_optional_body_may_be_absent() {
        let req = Request::builder().method("POST").body(Body::empty()).unwrap();
        let OptionalValidatedJson(probe) = OptionalValidatedJson::<Probe>::from_request(req, &())
            .await
            .unwrap();
        assert!(probe.is_none());
    }

    #[tokio::test]
    async fn test_optional_body_still_validated() {
        let err = OptionalValidatedJson::<Probe>::from_request(json_request(r#"{"name":""}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
