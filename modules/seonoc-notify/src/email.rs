use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::backend::EmailSender;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// HTML email via an HTTP send provider (Resend-compatible API shape).
pub struct EmailClient {
    endpoint: String,
    http: reqwest::Client,
}

impl EmailClient {
    pub fn new() -> Self {
        Self::with_endpoint("https://api.resend.com/emails")
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl Default for EmailClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for EmailClient {
    async fn send(
        &self,
        api_key: &str,
        from: &str,
        to: &[String],
        subject: &str,
        html: &str,
    ) -> anyhow::Result<()> {
        let payload = json!({
            "from": from,
            "to": to,
            "subject": subject,
            "html": html,
        });
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, "Email provider returned non-success");
            anyhow::bail!("email API error {status}: {body}");
        }
        Ok(())
    }
}
