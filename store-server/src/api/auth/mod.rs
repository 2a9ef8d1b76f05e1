//! Account routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Public routes
        .route("/api/register", post(handler::register))
        .route("/api/login", post(handler::login))
        // Protected routes (user token)
        .route("/api/me", get(handler::me))
        .route("/api/user/password", post(handler::change_password))
}
