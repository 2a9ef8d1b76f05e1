//! Account handlers
//!
//! Registration, login, profile, and password change.

use axum::{Json, extract::State};

use crate::api::AppJson;
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::user;
use shared::client::{
    AuthResponse, ChangePasswordRequest, LoginRequest, OkResponse, RegisterRequest, UserInfo,
    UserProfile,
};
use shared::{AppError, AppResult};

/// Minimum accepted login length
const MIN_LOGIN_LEN: usize = 3;

/// POST /api/register
///
/// Creates the account and logs the user straight in.
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    if req.name.is_empty()
        || req.surname.is_empty()
        || req.login.is_empty()
        || req.email.is_empty()
        || req.pass.is_empty()
    {
        return Err(AppError::validation("Missing fields"));
    }
    if req.login.len() < MIN_LOGIN_LEN {
        return Err(AppError::validation("Login too short"));
    }

    let created = user::create(
        &state.storage,
        &req.name,
        &req.surname,
        &req.login,
        &req.email,
        &req.pass,
    )?;

    let token = state
        .jwt
        .issue_user(&created)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: UserInfo::from(&created),
    }))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let authed = user::authenticate(&state.storage, &req.login, &req.pass)?;

    let token = state
        .jwt
        .issue_user(&authed)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {}", e)))?;

    tracing::info!(user_id = %authed.id, login = %authed.login, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserInfo::from(&authed),
    }))
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let record = user::find_by_id(&state.storage, &current.id)?
        .ok_or_else(|| AppError::not_found(format!("User {}", current.id)))?;

    Ok(Json(UserProfile::from(&record)))
}

/// POST /api/user/password
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<OkResponse>> {
    if req.new_pass.is_empty() {
        return Err(AppError::validation("New password must not be empty"));
    }

    user::change_password(&state.storage, &current.id, &req.old_pass, &req.new_pass)?;

    tracing::info!(user_id = %current.id, "Password changed");
    Ok(Json(OkResponse { ok: true }))
}
