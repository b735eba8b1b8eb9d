use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use seonoc_common::settings::{
    EmailAlertSettings, TelegramMonitoringSettings, TelegramSeoSettings, KEY_EMAIL_ALERTS,
    KEY_TELEGRAM_MONITORING, KEY_TELEGRAM_SEO,
};
use seonoc_common::types::{Channel, EventType, Severity, TopicFamily};
use seonoc_store::StoreClient;
use seonoc_templates::TemplateStore;

use crate::backend::{ChatSender, EmailSender};

/// Settings-driven fan-out. Settings rows are read fresh on every event so
/// admin changes apply immediately; failures are logged and reported as
/// `false`, never propagated: delivery is best-effort by contract.
pub struct NotificationRouter {
    store: StoreClient,
    templates: Arc<TemplateStore>,
    chat: Arc<dyn ChatSender>,
    email: Arc<dyn EmailSender>,
}

impl NotificationRouter {
    pub fn new(
        store: StoreClient,
        templates: Arc<TemplateStore>,
        chat: Arc<dyn ChatSender>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            store,
            templates,
            chat,
            email,
        }
    }

    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }

    /// Render and send a templated event through the SEO chat channel.
    /// Returns false when the channel is unconfigured, the template pair is
    /// disabled, or delivery failed.
    pub async fn send_event(&self, event_type: EventType, context: &Value) -> bool {
        let body = match self
            .templates
            .render_event(Channel::Telegram, event_type, context)
            .await
        {
            Ok(Some(body)) => body,
            Ok(None) => {
                info!(event = event_type.as_str(), "Template disabled, skipping send");
                return false;
            }
            Err(e) => {
                warn!(error = %e, event = event_type.as_str(), "Template render failed");
                return false;
            }
        };
        self.send_seo_text(&body, event_type.topic_family()).await
    }

    /// Send a pre-built message through the SEO chat channel.
    pub async fn send_seo_text(&self, text: &str, family: Option<TopicFamily>) -> bool {
        let settings: TelegramSeoSettings = match self.store.settings().get(KEY_TELEGRAM_SEO).await
        {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to read chat settings");
                return false;
            }
        };
        if !settings.is_configured() {
            warn!("SEO chat channel not configured, dropping notification");
            return false;
        }
        let thread_id = family.and_then(|f| settings.topic_id(f));
        match self
            .chat
            .send(&settings.bot_token, &settings.chat_id, text, thread_id)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Chat send failed");
                false
            }
        }
    }

    /// Monitoring alerts go to the dedicated monitoring channel only.
    /// No fallback to the SEO channel, by policy.
    pub async fn send_monitoring_event(&self, event_type: EventType, context: &Value) -> bool {
        let body = match self
            .templates
            .render_event(Channel::Telegram, event_type, context)
            .await
        {
            Ok(Some(body)) => body,
            Ok(None) => {
                info!(event = event_type.as_str(), "Template disabled, skipping send");
                return false;
            }
            Err(e) => {
                warn!(error = %e, event = event_type.as_str(), "Template render failed");
                return false;
            }
        };
        self.send_monitoring_text(&body).await
    }

    pub async fn send_monitoring_text(&self, text: &str) -> bool {
        let settings: TelegramMonitoringSettings =
            match self.store.settings().get(KEY_TELEGRAM_MONITORING).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "Failed to read monitoring chat settings");
                    return false;
                }
            };
        if !settings.is_configured() {
            warn!("Monitoring chat channel not configured, dropping alert");
            return false;
        }
        match self
            .chat
            .send(&settings.bot_token, &settings.chat_id, text, None)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Monitoring chat send failed");
                false
            }
        }
    }

    /// Email to the global admin list, gated on the configured minimum
    /// severity. `severity` None bypasses the gate (digest mail).
    pub async fn send_admin_email(
        &self,
        subject: &str,
        html: &str,
        severity: Option<Severity>,
    ) -> bool {
        let settings: EmailAlertSettings = match self.store.settings().get(KEY_EMAIL_ALERTS).await
        {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to read email settings");
                return false;
            }
        };
        if !settings.enabled || settings.api_key.is_empty() {
            return false;
        }
        if let Some(severity) = severity {
            if severity < settings.min_severity {
                return false;
            }
        }
        let recipients: Vec<String> = settings
            .global_admin_emails
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| e.contains('@'))
            .collect();
        if recipients.is_empty() {
            warn!("No admin recipients configured, dropping email");
            return false;
        }
        match self
            .email
            .send(
                &settings.api_key,
                &settings.sender_email,
                &recipients,
                subject,
                html,
            )
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Email send failed");
                false
            }
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }
}
