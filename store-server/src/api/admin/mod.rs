//! Admin routes
//!
//! The login handshake routes are public: the nonce itself is the
//! credential, and `verify` is hit out-of-band from the link sent to
//! the administrator. Everything else requires an admin token.

mod handler;

use axum::{Router, routing::delete, routing::get, routing::post};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Out-of-band login handshake (public)
        .route("/api/admin/request-login", post(handler::request_login))
        .route("/api/admin/verify", get(handler::verify))
        .route("/api/admin/check", get(handler::check))
        .route("/api/admin/token", get(handler::token))
        // Administration (admin token)
        .route("/api/admin/orders", get(handler::list_orders))
        .route("/api/admin/orders/{id}/fulfill", post(handler::fulfill))
        .route("/api/admin/users", get(handler::list_users))
        .route("/api/admin/users/{id}/ban", post(handler::ban))
        .route("/api/admin/users/{id}/password", post(handler::reset_password))
        .route("/api/admin/users/{id}", delete(handler::delete_user))
}
