//! Core server modules
//!
//! - [`Config`] - environment-driven configuration
//! - [`AppState`] - shared application state
//! - [`Server`] - HTTP server startup and shutdown

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::AppState;
