//! Admin handlers
//!
//! Out-of-band login handshake plus order and user administration.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::AppJson;
use crate::auth::{AdminUser, NonceError};
use crate::core::AppState;
use crate::db::repository::{order, user};
use shared::client::{
    AdminUserEntry, BanResponse, CheckResponse, FulfillRequest, OkResponse,
    RequestLoginResponse, ResetPasswordResponse, TokenResponse,
};
use shared::models::Order;
use shared::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct NonceQuery {
    pub nonce: String,
}

/// POST /api/admin/request-login
///
/// Creates a pending nonce and sends the verification link to the
/// administrator's out-of-band channel.
pub async fn request_login(
    State(state): State<AppState>,
) -> AppResult<Json<RequestLoginResponse>> {
    let nonce = state.nonces.request_login();
    state.notifier.send(state.verify_url(&nonce));

    Ok(Json(RequestLoginResponse { ok: true, nonce }))
}

/// GET /api/admin/verify?nonce=
///
/// The out-of-band confirmation action: visiting the link flips the
/// nonce to verified and shows a small confirmation page. The page is
/// rendered for a human in a browser, so an unknown nonce gets a plain
/// 400 body instead of the JSON envelope.
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<NonceQuery>,
) -> Response {
    match state.nonces.confirm(&query.nonce) {
        Ok(()) => {
            tracing::info!(nonce = %query.nonce, "Admin login confirmed out-of-band");
            Html("<h2>Login confirmed ✔</h2>").into_response()
        }
        Err(_) => (StatusCode::BAD_REQUEST, "Invalid nonce").into_response(),
    }
}

/// GET /api/admin/check?nonce=
///
/// Polled by the waiting admin client; `false` for unknown nonces.
pub async fn check(
    State(state): State<AppState>,
    Query(query): Query<NonceQuery>,
) -> Json<CheckResponse> {
    Json(CheckResponse {
        verified: state.nonces.check(&query.nonce),
    })
}

/// GET /api/admin/token?nonce=
///
/// Exchanges a verified nonce for a 6-hour admin token. The nonce is
/// consumed on success and cannot be exchanged again.
pub async fn token(
    State(state): State<AppState>,
    Query(query): Query<NonceQuery>,
) -> AppResult<Json<TokenResponse>> {
    state.nonces.exchange(&query.nonce).map_err(|e| match e {
        NonceError::NotVerified | NonceError::NotFound => {
            AppError::forbidden("Nonce not verified")
        }
    })?;

    let token = state
        .jwt
        .issue_admin()
        .map_err(|e| AppError::internal(format!("Failed to issue token: {}", e)))?;

    tracing::info!("Admin token issued");
    Ok(Json(TokenResponse { token }))
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.storage)?;
    Ok(Json(orders))
}

/// POST /api/admin/orders/:id/fulfill
///
/// `id` may be the internal order id or the human-facing number.
pub async fn fulfill(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<FulfillRequest>,
) -> AppResult<Json<Order>> {
    if req.key.is_empty() {
        return Err(AppError::validation("Key must not be empty"));
    }

    let order = order::fulfill(&state.storage, &id, &req.key)?;
    Ok(Json(order))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<AdminUserEntry>>> {
    let users = user::list(&state.storage)?;

    let mut entries = Vec::with_capacity(users.len());
    for u in &users {
        entries.push(AdminUserEntry {
            id: u.id.clone(),
            login: u.login.clone(),
            name: u.name.clone(),
            surname: u.surname.clone(),
            email: u.email.clone(),
            created_at: u.created_at,
            banned: u.banned,
            order_count: order::count_for_login(&state.storage, &u.login)?,
        });
    }

    Ok(Json(entries))
}

/// POST /api/admin/users/:id/ban
///
/// Toggles the ban flag and returns the new value.
pub async fn ban(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<BanResponse>> {
    let current = user::find_by_id(&state.storage, &id)?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;

    let updated = user::set_banned(&state.storage, &id, !current.banned)?;
    Ok(Json(BanResponse {
        banned: updated.banned,
    }))
}

/// POST /api/admin/users/:id/password
///
/// Forces a reset to a fresh temporary password.
pub async fn reset_password(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ResetPasswordResponse>> {
    let new_pass = user::force_reset_password(&state.storage, &id)?;
    Ok(Json(ResetPasswordResponse { ok: true, new_pass }))
}

/// DELETE /api/admin/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    user::delete(&state.storage, &id)?;
    Ok(Json(OkResponse { ok: true }))
}
