//! Storefront order backend
//!
//! HTTP service for a small storefront: customer registration and login,
//! order placement, and an out-of-band admin login handshake used to
//! review and fulfill orders.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod utils;

pub use core::{AppState, Config, Server};
pub use shared::{AppError, AppResult};
