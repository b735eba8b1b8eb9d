use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::backend::ChatSender;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API sendMessage client with forum-topic routing.
pub struct TelegramClient {
    base_url: String,
    http: reqwest::Client,
}

impl TelegramClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.telegram.org")
    }

    /// Custom API host, used by tests against a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn post_send(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
        thread_id: Option<i64>,
    ) -> anyhow::Result<(bool, String)> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, bot_token);
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(id) = thread_id {
            payload["message_thread_id"] = json!(id);
        }
        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;
        let ok = resp.status().is_success();
        let body = if ok {
            String::new()
        } else {
            resp.text().await.unwrap_or_default()
        };
        Ok((ok, body))
    }
}

impl Default for TelegramClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatSender for TelegramClient {
    async fn send(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
        thread_id: Option<i64>,
    ) -> anyhow::Result<()> {
        let (ok, error_body) = self.post_send(bot_token, chat_id, text, thread_id).await?;
        if ok {
            info!(topic = ?thread_id, "Chat notification sent");
            return Ok(());
        }

        // An invalid forum topic should not lose the message: retry once
        // into the general channel.
        let lower = error_body.to_lowercase();
        let topic_problem = thread_id.is_some()
            && (lower.contains("thread")
                || lower.contains("topic")
                || lower.contains("message_thread_id"));
        if topic_problem {
            warn!(topic = ?thread_id, "Invalid topic id, retrying without topic routing");
            let (ok, error_body) = self.post_send(bot_token, chat_id, text, None).await?;
            if ok {
                info!("Chat notification sent (fallback to general after invalid topic)");
                return Ok(());
            }
            anyhow::bail!("chat API error: {error_body}");
        }

        anyhow::bail!("chat API error: {error_body}")
    }
}
