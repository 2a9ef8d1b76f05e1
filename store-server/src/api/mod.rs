//! API routing
//!
//! # Structure
//!
//! - [`auth`] - registration, login, profile, password change
//! - [`orders`] - order placement and per-user views
//! - [`admin`] - out-of-band admin login and administration

pub mod admin;
pub mod auth;
pub mod orders;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::AppState;
use shared::AppError;

/// JSON body extractor for request payloads
///
/// Missing or malformed fields fail as a 400 with the structured
/// `{code, message}` envelope rather than axum's plain-text 422.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(orders::router())
        .merge(admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
