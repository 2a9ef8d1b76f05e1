//! Admin notification gateway
//!
//! Delivers human-readable text to the administrator's Telegram chat.
//! Delivery is best-effort: messages are dispatched on a detached task,
//! failures are logged and never propagated, and the gateway degrades to
//! a no-op when no bot token is configured.

use std::sync::Arc;

use serde::Serialize;

use crate::core::Config;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

struct TelegramChannel {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramChannel {
    async fn send(&self, text: &str) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        match self.client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!("Admin notification delivered");
            }
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Admin notification rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to deliver admin notification");
            }
        }
    }
}

/// Best-effort notifier for the administrator channel
#[derive(Clone)]
pub struct Notifier {
    channel: Option<Arc<TelegramChannel>>,
}

impl Notifier {
    pub fn from_config(config: &Config) -> Self {
        if config.bot_token.is_empty() || config.admin_chat_id.is_empty() {
            tracing::info!("BOT_TOKEN/ADMIN_CHAT_ID not set, admin notifications disabled");
            return Self::disabled();
        }

        Self {
            channel: Some(Arc::new(TelegramChannel {
                client: reqwest::Client::new(),
                bot_token: config.bot_token.clone(),
                chat_id: config.admin_chat_id.clone(),
            })),
        }
    }

    /// A notifier that drops everything (tests, unconfigured deployments)
    pub fn disabled() -> Self {
        Self { channel: None }
    }

    /// Dispatch a message without blocking the caller
    ///
    /// Returns immediately; the send runs on a detached task and its
    /// failure never fails the triggering operation.
    pub fn send(&self, text: impl Into<String>) {
        let Some(channel) = self.channel.clone() else {
            return;
        };
        let text = text.into();
        tokio::spawn(async move {
            channel.send(&text).await;
        });
    }
}
