//! Session tokens: HS256 JWT access tokens and opaque refresh tokens.
//!
//! Access tokens go to browsers as an HttpOnly cookie and to API clients in
//! the login response body. Each one names the `user_sessions` row it was
//! issued with. Refresh tokens are random strings stored server-side only as
//! SHA-256 hashes.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use repairdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_or;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Operator id.
    pub sub: DbId,
    pub username: String,
    pub is_admin: bool,
    /// The `user_sessions` row this token belongs to. Revoking that row ends
    /// the token before `exp`.
    pub sid: DbId,
    /// Unix seconds.
    pub exp: i64,
    /// Unix seconds.
    pub iat: i64,
    /// Random per token, so two logins in the same second still differ.
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// `JWT_SECRET` is mandatory. `JWT_ACCESS_EXPIRY_MINS` defaults to 15 and
    /// `JWT_REFRESH_EXPIRY_DAYS` to 7.
    ///
    /// # Panics
    ///
    /// When the secret is missing or blank, or a lifetime is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.trim().is_empty(), "JWT_SECRET must be set");

        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }

    /// Access token lifetime in seconds, as reported to clients and used for
    /// the cookie `Max-Age`.
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Signs an access token for an operator's session.
pub fn generate_access_token(
    user_id: DbId,
    username: &str,
    is_admin: bool,
    session_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        is_admin,
        sid: session_id,
        exp: now + config.access_token_expiry_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Checks signature and expiry and returns the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// A fresh refresh token and the digest to store for it, as
/// `(token, digest)`. The token itself is never persisted.
pub fn generate_refresh_token() -> (String, String) {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let digest = hash_refresh_token(&token);
    (token, digest)
}

/// Lowercase hex SHA-256.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
