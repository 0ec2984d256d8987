//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AdjustPointsRequest, AdminUpdateMemberRequest, ConfirmVerificationRequest,
    CreateEventRequest, FeesInput, LoginRequest, LogoutRequest, PhoneInput, RefreshTokenRequest,
    RegisterRequest, UpdateEventRequest, UpdateProfileRequest,
};

pub use responses::{
    AchievementResponse, AuthResponse, CapacityResponse, CatalogEntryResponse,
    EligibilityResponse, EventResponse, HealthCheck, HealthResponse, MemberResponse,
    PageResponse, PhoneResponse, PointsAdjustedResponse, ProfileResponse, PublicMemberResponse,
    ReadinessResponse, RegistrationResponse, ScoreCardResponse, VerificationIssuedResponse,
    VerificationResultResponse, VirtualCardResponse,
};
