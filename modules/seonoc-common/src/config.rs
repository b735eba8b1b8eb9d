use std::env;

/// Application configuration loaded from environment variables.
///
/// Mutable operational settings (channel credentials, schedules, thresholds)
/// live in the `settings` collection and are read fresh at every event; this
/// struct only carries what must exist before the store is reachable.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub db_name: String,

    /// Held for the external auth layer; the core never reads it.
    pub jwt_secret: String,

    // Fallback chat credentials when no settings row is configured yet.
    pub chat_bot_token_default: String,
    pub chat_chat_id_default: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            mongo_uri: required_env("SEONOC_MONGO_URI"),
            db_name: env::var("SEONOC_DB_NAME").unwrap_or_else(|_| "seonoc".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            chat_bot_token_default: env::var("CHAT_BOT_TOKEN").unwrap_or_default(),
            chat_chat_id_default: env::var("CHAT_CHAT_ID").unwrap_or_default(),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }

    /// Log sensitive values by length only.
    pub fn log_redacted(&self) {
        let vars = [
            ("SEONOC_MONGO_URI", &self.mongo_uri),
            ("JWT_SECRET", &self.jwt_secret),
            ("CHAT_BOT_TOKEN", &self.chat_bot_token_default),
        ];
        for (name, value) in vars {
            if value.is_empty() {
                tracing::info!("{name} = (empty)");
            } else {
                tracing::info!("{name} = ({} chars)", value.len());
            }
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
