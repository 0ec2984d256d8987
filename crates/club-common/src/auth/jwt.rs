//! HS256 access/refresh tokens.
//!
//! Access tokens authenticate API calls. Refresh tokens carry a `jti` that
//! doubles as the session id in the refresh-session store, so revoking the
//! session kills the token even before it expires.

use chrono::Utc;
use club_core::{MemberId, MemberRole};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    /// Role when the token was minted; admin routes re-read the stored role
    pub role: MemberRole,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    pub fn member_id(&self) -> Result<MemberId, AppError> {
        MemberId::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// What a successful login or refresh hands back
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    /// `jti` of `refresh_token`, the key for the refresh-session store
    #[serde(skip)]
    pub session_id: String,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// # Errors
    /// `AppError::Internal` if signing fails
    pub fn generate_token_pair(&self, member_id: MemberId, role: MemberRole) -> Result<TokenPair, AppError> {
        let (access_token, _) = self.sign(member_id, role, TokenType::Access)?;
        let (refresh_token, session_id) = self.sign(member_id, role, TokenType::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_secs,
            session_id,
        })
    }

    /// Returns the token and its `jti`
    fn sign(&self, member_id: MemberId, role: MemberRole, token_type: TokenType) -> Result<(String, String), AppError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: member_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            role,
            iat,
            exp: iat + ttl,
            token_type,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("signing {token_type:?} token: {e}")))?;
        Ok((token, claims.jti))
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?
            .claims;

        if claims.token_type != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    /// # Errors
    /// `TokenExpired` past `exp`, `InvalidToken` for anything else wrong,
    /// including a refresh token presented here
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenType::Access)
    }

    /// # Errors
    /// Same as [`Self::validate_access_token`], with the kinds swapped
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenType::Refresh)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}
