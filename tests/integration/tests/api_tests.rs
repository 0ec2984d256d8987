//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: API_PORT, DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn register(server: &TestServer, request: &RegisterRequest) -> AuthResponse {
    let response = server.post("/api/v1/auth/register", request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn verify(server: &TestServer, token: &str, channel: &str) -> VerificationResultResponse {
    let response = server
        .post_empty(&format!("/api/v1/members/@me/verification/{channel}"), token)
        .await
        .unwrap();
    let issued: VerificationIssuedResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(issued.channel, channel);
    let code = issued.code.expect("codes are exposed outside production");

    let response = server
        .post_auth(
            &format!("/api/v1/members/@me/verification/{channel}/confirm"),
            token,
            &ConfirmVerificationRequest { code },
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_awards_welcome() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    let auth = register(&server, &request).await;

    assert_eq!(auth.member.username, request.username);
    assert_eq!(auth.member.points, 50);
    assert_eq!(auth.member.achievements.len(), 1);
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let first = RegisterRequest::unique();
    register(&server, &first).await;

    let second = RegisterRequest {
        email: first.email.to_uppercase(),
        ..RegisterRequest::unique()
    };
    let response = server.post("/api/v1/auth/register", &second).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "EMAIL_TAKEN");
    assert_eq!(body.error.field.as_deref(), Some("email"));
}

#[tokio::test]
async fn test_login_by_username_or_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    register(&server, &request).await;

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.member.username, request.username);

    let by_email = LoginRequest {
        login: request.email.clone(),
        password: request.password.clone(),
    };
    let response = server.post("/api/v1/auth/login", &by_email).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        login: "nobody@example.com".to_string(),
        password: "wrongpass".to_string(),
    };

    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::unique()).await;

    let refresh = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/api/v1/auth/refresh", &refresh).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    let response = server.post("/api/v1/auth/refresh", &refresh).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::unique()).await;

    let response = server
        .post_auth(
            "/api/v1/auth/logout",
            &auth.access_token,
            &json!({ "refresh_token": auth.refresh_token }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let refresh = RefreshTokenRequest {
        refresh_token: auth.refresh_token,
    };
    let response = server.post("/api/v1/auth/refresh", &refresh).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Member Tests
// ============================================================================

#[tokio::test]
async fn test_get_me_requires_auth() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/members/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_profile_update_marks_complete() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::unique()).await;
    assert!(!auth.member.profile.complete);

    let update = UpdateProfileRequest {
        address: Some("22 Quay Street".to_string()),
        date_of_birth: Some("1988-01-30".to_string()),
        experience: Some("Club treasurer".to_string()),
    };
    let response = server
        .patch_auth("/api/v1/members/@me", &auth.access_token, &update)
        .await
        .unwrap();
    let member: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(member.profile.complete);
    assert_eq!(member.points, 80);
}

// ============================================================================
// Verification and Achievement Tests
// ============================================================================

#[tokio::test]
async fn test_full_verification_unlocks_profile_master() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::complete()).await;
    assert_eq!(auth.member.points, 80);
    let token = auth.access_token;

    let email = verify(&server, &token, "email").await;
    assert_eq!(email.credited, 10);
    assert!(email.member.email_verified);
    assert!(email.minted.is_empty());

    let phone = verify(&server, &token, "phone").await;
    assert!(phone.member.phone_verified);
    assert_eq!(phone.credited, 110);
    assert_eq!(phone.minted.len(), 1);
    assert_eq!(phone.minted[0].title, "Profile Master");
    assert_eq!(phone.minted[0].points, 100);

    let response = server.get_auth("/api/v1/members/@me/score", &token).await.unwrap();
    let score: ScoreCardResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(score.points, 200);
    assert!(score.held.iter().any(|t| t == "Profile Master"));

    let response = server
        .post_empty("/api/v1/members/@me/verification/email", &token)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "ALREADY_VERIFIED");
}

#[tokio::test]
async fn test_wrong_code_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::unique()).await;
    let token = auth.access_token;

    let response = server
        .post_empty("/api/v1/members/@me/verification/email", &token)
        .await
        .unwrap();
    let issued: VerificationIssuedResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let code = issued.code.unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = server
        .post_auth(
            "/api/v1/members/@me/verification/email/confirm",
            &token,
            &ConfirmVerificationRequest { code: wrong.to_string() },
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_OTP");
    assert_eq!(body.error.field.as_deref(), Some("code"));
}

#[tokio::test]
async fn test_catalog_lists_all_titles() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/achievements/catalog").await.unwrap();
    let catalog: Vec<CatalogEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let welcome = catalog.iter().find(|e| e.title == "Welcome").unwrap();
    assert_eq!(welcome.points, 50);
    assert!(catalog.iter().any(|e| e.title == "Profile Master"));
}

// ============================================================================
// Virtual Card Tests
// ============================================================================

#[tokio::test]
async fn test_card_lookup_and_rotation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::unique()).await;
    let token = auth.access_token;

    let response = server.get_auth("/api/v1/members/@me/card", &token).await.unwrap();
    let card: VirtualCardResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(card.member_id, auth.member.id);
    assert_eq!(card.points, 50);

    let response = server
        .get(&format!("/api/v1/cards/{}", card.card_code.to_lowercase()))
        .await
        .unwrap();
    let shared: VirtualCardResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(shared.member_id, card.member_id);

    let response = server
        .post_empty("/api/v1/members/@me/card/rotate", &token)
        .await
        .unwrap();
    let rotated: VirtualCardResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.card_code, card.card_code);

    let response = server
        .get(&format!("/api/v1/cards/{}", card.card_code))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_members_cannot_author_events() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server, &RegisterRequest::unique()).await;

    let event = json!({
        "name": "Night Hike",
        "category": "social",
        "starts_at": "2031-02-01T19:00:00Z",
        "ends_at": "2031-02-01T23:00:00Z",
        "venue": { "kind": "online", "url": "https://meet.example.com/hike" }
    });
    let response = server
        .post_auth("/api/v1/events", &auth.access_token, &event)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_ADMIN");
}

#[tokio::test]
async fn test_anonymous_event_listing_hides_drafts() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/events?limit=100").await.unwrap();
    let page: PageResponse<EventResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(page.data.iter().all(|e| e.status != "draft"));

    let response = server.get("/api/v1/events?include_drafts=true").await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}
