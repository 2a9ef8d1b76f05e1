use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP service port |
/// | DATA_DIR | ./data | Directory holding the record store |
/// | BASE_URL | http://localhost:{port} | Public base URL embedded in verification links |
/// | JWT_SECRET | — | Token signing key |
/// | BOT_TOKEN | (empty) | Telegram bot token; notifications are disabled when empty |
/// | ADMIN_CHAT_ID | (empty) | Telegram chat id of the administrator |
/// | NONCE_TTL_SECS | 300 | Maximum age of an admin login nonce |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API service port
    pub http_port: u16,
    /// Directory holding the record store
    pub data_dir: PathBuf,
    /// Public base URL, used to build the admin verification link
    pub base_url: String,
    /// JWT signing configuration
    pub jwt: JwtConfig,
    /// Telegram bot token (empty disables notifications)
    pub bot_token: String,
    /// Telegram chat id of the administrator
    pub admin_chat_id: String,
    /// Maximum age of an admin login nonce, in seconds
    pub nonce_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            http_port,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", http_port)),
            jwt: JwtConfig::from_env(),
            bot_token: std::env::var("BOT_TOKEN").unwrap_or_default(),
            admin_chat_id: std::env::var("ADMIN_CHAT_ID").unwrap_or_default(),
            nonce_ttl_secs: std::env::var("NONCE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}
