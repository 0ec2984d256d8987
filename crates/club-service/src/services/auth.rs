//! Authentication service
//!
//! Handles member registration, login, token refresh, and logout.

use club_common::auth::{hash_password, validate_password_strength, PasswordService};
use club_common::{AppError, Claims};
use club_core::{generate_card_code, plan_registration, Member, MemberId, MemberProfile, PhoneNumber};
use club_core::DomainError;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, MemberResponse, RefreshTokenRequest, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Trim optional free text, treating blank as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new member with the Welcome record and opening balance
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let phone = PhoneNumber::from(request.phone);

        // Early, friendlier conflicts; the unique constraints still decide races
        let repo = self.ctx.member_repo();
        let (username_taken, email_taken, phone_taken) = tokio::try_join!(
            repo.username_exists(&username),
            repo.email_exists(&email),
            repo.phone_exists(&phone),
        )?;
        if username_taken {
            return Err(DomainError::UsernameTaken.into());
        }
        if email_taken {
            return Err(DomainError::EmailTaken.into());
        }
        if phone_taken {
            return Err(DomainError::PhoneTaken.into());
        }

        let profile = MemberProfile {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            address: non_blank(request.address),
            date_of_birth: request.date_of_birth,
            experience: non_blank(request.experience),
        };
        let mut member = Member::new(MemberId::new(), username, email, phone, profile);

        let plan = plan_registration(&member);
        let records = plan.apply(&mut member);

        let password_hash = hash_password(&request.password)?;
        match repo.create(&member, &password_hash, &records).await {
            Err(DomainError::CardCodeTaken) => {
                warn!(member_id = %member.id, "Card code collision, regenerating");
                member.card_code = generate_card_code();
                repo.create(&member, &password_hash, &records).await?;
            }
            result => result?,
        }

        info!(
            member_id = %member.id,
            opening_balance = %plan.opening_balance.total(),
            "Member registered"
        );

        self.issue_session(&member).await
    }

    /// Login with a username or email and a password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let login = request.login.trim();
        let repo = self.ctx.member_repo();

        let found = if login.contains('@') {
            repo.find_by_email(login).await?
        } else {
            repo.find_by_username(login).await?
        };
        let member = found.ok_or_else(|| {
            warn!("Login failed: member not found");
            ServiceError::App(AppError::InvalidCredentials)
        })?;

        let password_hash = repo.get_password_hash(member.id).await?.ok_or_else(|| {
            warn!(member_id = %member.id, "Login failed: no password hash");
            ServiceError::App(AppError::InvalidCredentials)
        })?;

        PasswordService.verify_or_reject(&request.password, &password_hash).map_err(|e| {
            warn!(member_id = %member.id, "Login failed: invalid password");
            ServiceError::from(e)
        })?;

        if !member.is_active() {
            warn!(member_id = %member.id, "Login refused: inactive member");
            return Err(DomainError::InactiveMember.into());
        }

        info!(member_id = %member.id, "Member logged in");
        self.issue_session(&member).await
    }

    /// Rotate a refresh token into a new pair
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let member_id = claims.member_id()?;

        let owner = self.ctx.session_store().validate(&claims.jti).await?;
        if owner != Some(member_id) {
            warn!(member_id = %member_id, "Refresh rejected: session not live");
            return Err(AppError::InvalidToken.into());
        }

        self.ctx.session_store().revoke(&claims.jti).await?;

        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))?;
        if !member.is_active() {
            return Err(DomainError::InactiveMember.into());
        }

        info!(member_id = %member.id, "Tokens refreshed");
        self.issue_session(&member).await
    }

    /// Revoke one refresh token, or all of the member's sessions
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, member_id: MemberId, refresh_token: Option<String>) -> ServiceResult<()> {
        if let Some(token) = refresh_token {
            let claims = self.ctx.jwt_service().validate_refresh_token(&token)?;
            if claims.member_id()? != member_id {
                return Err(AppError::InvalidToken.into());
            }
            self.ctx.session_store().revoke(&claims.jti).await?;
        } else {
            let revoked = self.ctx.session_store().revoke_all(member_id).await?;
            info!(member_id = %member_id, revoked, "Revoked all sessions");
        }

        info!(member_id = %member_id, "Member logged out");
        Ok(())
    }

    /// Validate an access token and return its claims
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        Ok(self.ctx.jwt_service().validate_access_token(token)?)
    }

    async fn issue_session(&self, member: &Member) -> ServiceResult<AuthResponse> {
        let tokens = self.ctx.jwt_service().generate_token_pair(member.id, member.role)?;
        self.ctx.session_store().store(&tokens.session_id, member.id).await?;

        Ok(AuthResponse::new(tokens, MemberResponse::from(member)))
    }
}
