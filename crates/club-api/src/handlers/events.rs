//! Event handlers
//!
//! Listing and reading are open to anonymous callers. Drafts stay hidden
//! unless an admin asks for them. Authoring is admin-only, and registration
//! acts on the calling member.

use axum::{
    extract::{Query, State},
    Json,
};
use club_core::{EventId, EventPhase};
use club_service::dto::{
    CreateEventRequest, EligibilityResponse, EventResponse, PageResponse, RegistrationResponse,
    UpdateEventRequest,
};
use club_service::{EventListFilter, EventService};
use serde::Deserialize;

use crate::extractors::{AuthUser, EventIdPath, OptionalAuthUser, Pagination, Parsed, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub include_drafts: bool,
}

impl EventListParams {
    fn phase(&self) -> Result<Option<EventPhase>, ApiError> {
        self.phase
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<EventPhase>().map_err(ApiError::invalid_query))
            .transpose()
    }
}

/// GET /events?phase=&include_drafts=&after=&limit=
pub async fn list_events(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Query(params): Query<EventListParams>,
    pagination: Pagination,
) -> ApiResult<Json<PageResponse<EventResponse>>> {
    let filter = EventListFilter {
        phase: params.phase()?,
        include_drafts: params.include_drafts,
        page: pagination.page::<EventId>()?,
    };
    let service = EventService::new(state.service_context());
    Ok(Json(service.list(auth.member_id(), filter).await?))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Created<Json<EventResponse>>> {
    let service = EventService::new(state.service_context());
    Ok(Created(Json(service.create(auth.member_id, request).await?)))
}

/// GET /events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.get(auth.member_id(), event_id).await?))
}

/// PATCH /events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.update(auth.member_id, event_id, request).await?))
}

/// DELETE /events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<NoContent> {
    let service = EventService::new(state.service_context());
    service.delete(auth.member_id, event_id).await?;
    Ok(NoContent)
}

/// POST /events/:event_id/publish
pub async fn publish_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.publish(auth.member_id, event_id).await?))
}

/// POST /events/:event_id/close
pub async fn close_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.close(auth.member_id, event_id).await?))
}

/// GET /events/:event_id/eligibility
pub async fn get_eligibility(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<Json<EligibilityResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.eligibility(auth.member_id, event_id).await?))
}

/// POST /events/:event_id/registrations/@me
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<Created<Json<RegistrationResponse>>> {
    let service = EventService::new(state.service_context());
    Ok(Created(Json(service.register(auth.member_id, event_id).await?)))
}

/// DELETE /events/:event_id/registrations/@me
pub async fn cancel_registration(
    State(state): State<AppState>,
    auth: AuthUser,
    Parsed(event_id): EventIdPath,
) -> ApiResult<NoContent> {
    let service = EventService::new(state.service_context());
    service.cancel(auth.member_id, event_id).await?;
    Ok(NoContent)
}
