//! JWT token service
//!
//! The single token implementation used by every protected endpoint.
//! User and admin tokens share the signing mechanism and are told apart
//! by the `role` claim; admin tokens additionally carry a 6-hour expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::models::User;

/// Role claim of a regular customer token
pub const ROLE_USER: &str = "user";
/// Role claim of an administrator token
pub const ROLE_ADMIN: &str = "admin";

/// Admin tokens expire 6 hours after issue
pub const ADMIN_TOKEN_TTL_HOURS: i64 = 6;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing key (should be at least 32 bytes)
    pub secret: String,
}

impl JwtConfig {
    /// Load the signing key from the `JWT_SECRET` environment variable
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => {
                if secret.len() < 32 {
                    tracing::warn!("JWT_SECRET is shorter than 32 characters");
                }
                secret
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using insecure default key");
                "change_this_secret".to_string()
            }
        };
        Self { secret }
    }
}

/// Claims stored in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Role: `user` or `admin`
    pub role: String,
    /// Login of the user (absent on admin tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Id of the user (absent on admin tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiry timestamp; user tokens carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issue a token with the given claims and optional time-to-live
    pub fn issue(&self, mut claims: Claims, ttl: Option<Duration>) -> Result<String, JwtError> {
        let now = Utc::now();
        claims.iat = now.timestamp();
        claims.exp = ttl.map(|ttl| (now + ttl).timestamp());

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Issue a non-expiring customer token
    pub fn issue_user(&self, user: &User) -> Result<String, JwtError> {
        self.issue(
            Claims {
                role: ROLE_USER.to_string(),
                login: Some(user.login.clone()),
                id: Some(user.id.clone()),
                iat: 0,
                exp: None,
            },
            None,
        )
    }

    /// Issue an admin token with the 6-hour expiry
    pub fn issue_admin(&self) -> Result<String, JwtError> {
        self.issue(
            Claims {
                role: ROLE_ADMIN.to_string(),
                login: None,
                id: None,
                iat: 0,
                exp: None,
            },
            Some(Duration::hours(ADMIN_TOKEN_TTL_HOURS)),
        )
    }

    /// Verify and decode a token
    ///
    /// A token is accepted only if the signature matches the configured
    /// key and, when an expiry is present, the expiry has not passed.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // User tokens carry no expiry; only enforce `exp` when present.
        validation.set_required_spec_claims::<&str>(&[]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}
