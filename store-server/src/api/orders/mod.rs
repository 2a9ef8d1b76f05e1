//! Order routes (user scope)

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(handler::create).get(handler::list_mine))
        .route("/api/orders/history", get(handler::history))
        .route("/api/user/keys", get(handler::keys))
}
