//! Notification transport
//!
//! Best-effort plain-text delivery to an opaque target identifier.
//! The live implementation posts to the Telegram Bot API.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to `target`. Failures are reported, never retried here.
    async fn send(&self, target: &str, text: &str) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage`
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config_invalid(format!("Failed to build Telegram client: {}", e)))?;

        Ok(Self {
            client,
            bot_token: bot_token.into(),
            api_base: "https://api.telegram.org".to_string(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, target: &str, text: &str) -> AppResult<()> {
        let body = serde_json::json!({ "chat_id": target, "text": text });

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The bot token is part of the URL; strip it before logging
                let e = e.without_url();
                warn!("Telegram request failed: {}", e);
                AppError::notification_failed("Telegram request failed")
            })?;

        let status = response.status();
        let parsed: Option<TelegramResponse> = response.json().await.ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) => {
                debug!(chat = %target, "Notification delivered");
                Ok(())
            }
            Some(TelegramResponse { description, .. }) => Err(AppError::notification_failed(format!(
                "Telegram rejected message: {}",
                description.unwrap_or_else(|| status.to_string())
            ))),
            None => Err(AppError::notification_failed(format!(
                "Telegram returned unreadable response (HTTP {})",
                status
            ))),
        }
    }
}

/// Confirmation text sent after a successful subscription
pub fn subscription_message(deployer: &str, chain_name: &str) -> String {
    format!("✅ Now monitoring deployer {} on {}.", deployer, chain_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new("123:abc", Duration::from_secs(1)).unwrap();
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_subscription_message() {
        let text = subscription_message("0xabc", "Monad Mainnet");
        assert!(text.contains("0xabc"));
        assert!(text.contains("Monad Mainnet"));
    }
}
