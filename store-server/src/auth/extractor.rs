//! Auth extractors
//!
//! Bearer-token extractors for protected handlers. Each extractor checks
//! the `role` claim against the exact role its endpoints require.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{JwtError, JwtService, ROLE_ADMIN, ROLE_USER};
use crate::core::AppState;
use shared::AppError;

/// Authenticated customer, extracted from a `role: user` token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub login: String,
}

/// Authenticated administrator, extracted from a `role: admin` token
#[derive(Debug, Clone)]
pub struct AdminUser;

fn verify_bearer(parts: &Parts, jwt: &JwtService) -> Result<crate::auth::Claims, AppError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or(AppError::InvalidToken)?,
        None => {
            tracing::warn!(target: "security", uri = %parts.uri, "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    jwt.verify(token).map_err(|e| {
        tracing::warn!(target: "security", uri = %parts.uri, error = %e, "Token rejected");
        match e {
            JwtError::ExpiredToken => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    })
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted on this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let claims = verify_bearer(parts, &state.jwt)?;
        if claims.role != ROLE_USER {
            return Err(AppError::forbidden("User role required"));
        }

        let user = CurrentUser {
            id: claims.id.ok_or(AppError::InvalidToken)?,
            login: claims.login.ok_or(AppError::InvalidToken)?,
        };

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, &state.jwt)?;
        if claims.role != ROLE_ADMIN {
            tracing::warn!(target: "security", uri = %parts.uri, role = %claims.role, "Admin role required");
            return Err(AppError::forbidden("Admin role required"));
        }
        Ok(AdminUser)
    }
}
