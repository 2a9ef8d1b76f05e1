//! Order handlers

use axum::{Json, extract::State};

use crate::api::AppJson;
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::{order, user};
use shared::client::{CreateOrderRequest, KeyEntry};
use shared::models::Order;
use shared::{AppError, AppResult};

/// POST /api/orders
///
/// Rejects empty carts and banned accounts; on success notifies the
/// administrator (best-effort, never blocks the response).
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    if req.phone.is_empty() || req.items.is_empty() {
        return Err(AppError::validation("Empty cart"));
    }

    // Ban flag is checked on placement, not just at login
    let record = user::find_by_id(&state.storage, &current.id)?
        .ok_or_else(|| AppError::not_found(format!("User {}", current.id)))?;
    if record.banned {
        return Err(AppError::forbidden("Account is banned"));
    }

    let order = order::create(
        &state.storage,
        &current.login,
        &req.phone,
        req.items,
        req.total,
    )?;

    state.notifier.send(format!(
        "🧾 New order №{}\nUser: {}\nItems: {}\nTotal: {}",
        order.number,
        order.user_login,
        order.item_summary(),
        order.total,
    ));

    Ok(Json(order))
}

/// GET /api/orders
pub async fn list_mine(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_for_login(&state.storage, &current.login)?;
    Ok(Json(orders))
}

/// GET /api/orders/history
pub async fn history(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_fulfilled_for_login(&state.storage, &current.login)?;
    Ok(Json(orders))
}

/// GET /api/user/keys
///
/// Fulfillment keys for the caller's fulfilled orders.
pub async fn keys(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<KeyEntry>>> {
    let orders = order::find_fulfilled_for_login(&state.storage, &current.login)?;
    let keys = orders.iter().filter_map(KeyEntry::from_order).collect();
    Ok(Json(keys))
}
