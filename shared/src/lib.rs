//! Shared types for the storefront backend
//!
//! Common types used by the server and its clients: domain models,
//! request/response DTOs, and the unified error type.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResponse, AppResult};
pub use models::{Order, OrderItem, OrderStatus, User};
pub use serde::{Deserialize, Serialize};
