use std::sync::Mutex;

use async_trait::async_trait;

/// Chat delivery seam. Implementations are transport only; rendering,
/// throttling and dedup belong to the callers.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
        thread_id: Option<i64>,
    ) -> anyhow::Result<()>;
}

/// Email delivery seam.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        api_key: &str,
        from: &str,
        to: &[String],
        subject: &str,
        html: &str,
    ) -> anyhow::Result<()>;
}

/// Records sends instead of delivering. Test double.
#[derive(Default)]
pub struct NoopChat {
    pub sent: Mutex<Vec<SentChat>>,
}

#[derive(Debug, Clone)]
pub struct SentChat {
    pub chat_id: String,
    pub text: String,
    pub thread_id: Option<i64>,
}

#[async_trait]
impl ChatSender for NoopChat {
    async fn send(
        &self,
        _bot_token: &str,
        chat_id: &str,
        text: &str,
        thread_id: Option<i64>,
    ) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentChat {
                chat_id: chat_id.to_string(),
                text: text.to_string(),
                thread_id,
            });
        Ok(())
    }
}

#[derive(Default)]
pub struct NoopEmail {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
impl EmailSender for NoopEmail {
    async fn send(
        &self,
        _api_key: &str,
        _from: &str,
        to: &[String],
        subject: &str,
        html: &str,
    ) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentEmail {
                to: to.to_vec(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
        Ok(())
    }
}
