//! Mutable operational settings, one document per key in the `settings`
//! collection. Read fresh at every event so admin changes apply immediately.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub const KEY_TELEGRAM_SEO: &str = "telegram_seo";
pub const KEY_TELEGRAM_MONITORING: &str = "telegram_monitoring";
pub const KEY_EMAIL_ALERTS: &str = "email_alerts";
pub const KEY_WEEKLY_DIGEST: &str = "weekly_digest";
pub const KEY_OPTIMIZATION_REMINDERS: &str = "optimization_reminders";
pub const KEY_MONITORING_CONFIG: &str = "monitoring_config";
pub const KEY_SYSTEM_TIMEZONE: &str = "system_timezone";

/// SEO change/optimization/complaint/reminder channel, with optional forum
/// topic routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSeoSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub enable_topic_routing: bool,
    #[serde(default)]
    pub seo_change_topic_id: Option<i64>,
    #[serde(default)]
    pub seo_optimization_topic_id: Option<i64>,
    #[serde(default)]
    pub seo_complaint_topic_id: Option<i64>,
    #[serde(default)]
    pub seo_reminder_topic_id: Option<i64>,
    /// Usernames CC'd at the bottom of change messages.
    #[serde(default)]
    pub leader_usernames: Vec<String>,
}

impl Default for TelegramSeoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_token: String::new(),
            chat_id: String::new(),
            enable_topic_routing: false,
            seo_change_topic_id: None,
            seo_optimization_topic_id: None,
            seo_complaint_topic_id: None,
            seo_reminder_topic_id: None,
            leader_usernames: Vec::new(),
        }
    }
}

impl TelegramSeoSettings {
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }

    pub fn topic_id(&self, family: crate::types::TopicFamily) -> Option<i64> {
        use crate::types::TopicFamily::*;
        if !self.enable_topic_routing {
            return None;
        }
        match family {
            SeoChange => self.seo_change_topic_id,
            SeoOptimization => self.seo_optimization_topic_id,
            SeoComplaint => self.seo_complaint_topic_id,
            SeoReminder => self.seo_reminder_topic_id,
        }
    }
}

/// Dedicated monitoring channel. No fallback: unconfigured means
/// monitoring alerts are dropped, by policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramMonitoringSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

impl TelegramMonitoringSettings {
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAlertSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_sender")]
    pub sender_email: String,
    #[serde(default)]
    pub global_admin_emails: Vec<String>,
    /// Alerts below this severity are not emailed.
    #[serde(default = "default_min_severity")]
    pub min_severity: crate::types::Severity,
}

impl Default for EmailAlertSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            sender_email: default_sender(),
            global_admin_emails: Vec::new(),
            min_severity: default_min_severity(),
        }
    }
}

fn default_sender() -> String {
    "alerts@seonoc.local".to_string()
}

fn default_min_severity() -> crate::types::Severity {
    crate::types::Severity::High
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyDigestSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_digest_day")]
    pub schedule_day: String,
    #[serde(default = "default_digest_hour")]
    pub schedule_hour: u8,
    #[serde(default)]
    pub schedule_minute: u8,
    #[serde(default)]
    pub last_sent_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub include_expiring_domains: bool,
    #[serde(default = "default_true")]
    pub include_down_domains: bool,
    #[serde(default = "default_true")]
    pub include_soft_blocked: bool,
    #[serde(default = "default_expiring_threshold")]
    pub expiring_days_threshold: i64,
}

impl Default for WeeklyDigestSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule_day: default_digest_day(),
            schedule_hour: default_digest_hour(),
            schedule_minute: 0,
            last_sent_at: None,
            include_expiring_domains: true,
            include_down_domains: true,
            include_soft_blocked: true,
            expiring_days_threshold: default_expiring_threshold(),
        }
    }
}

impl WeeklyDigestSettings {
    pub fn weekday(&self) -> Option<chrono::Weekday> {
        match self.schedule_day.to_lowercase().as_str() {
            "monday" => Some(chrono::Weekday::Mon),
            "tuesday" => Some(chrono::Weekday::Tue),
            "wednesday" => Some(chrono::Weekday::Wed),
            "thursday" => Some(chrono::Weekday::Thu),
            "friday" => Some(chrono::Weekday::Fri),
            "saturday" => Some(chrono::Weekday::Sat),
            "sunday" => Some(chrono::Weekday::Sun),
            _ => None,
        }
    }
}

fn default_digest_day() -> String {
    "monday".to_string()
}

fn default_digest_hour() -> u8 {
    9
}

fn default_expiring_threshold() -> i64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReminderSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Default reminder cadence; networks may override within 1..=30.
    #[serde(default = "default_reminder_interval")]
    pub interval_days: i64,
    /// Per-network overrides, network id → days.
    #[serde(default)]
    pub network_overrides: std::collections::HashMap<String, i64>,
}

impl Default for OptimizationReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_days: default_reminder_interval(),
            network_overrides: std::collections::HashMap::new(),
        }
    }
}

impl OptimizationReminderSettings {
    pub fn interval_for(&self, network_id: &str) -> i64 {
        self.network_overrides
            .get(network_id)
            .copied()
            .unwrap_or(self.interval_days)
            .clamp(1, 30)
    }
}

fn default_reminder_interval() -> i64 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_availability_interval")]
    pub availability_interval_secs: u64,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub recovery_alerts_enabled: bool,
    /// Skip expiration alerts for auto-renewing domains.
    #[serde(default = "default_true")]
    pub exclude_auto_renew: bool,
    #[serde(default = "default_expiration_thresholds")]
    pub expiration_thresholds: Vec<i64>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            availability_interval_secs: default_availability_interval(),
            probe_timeout_secs: default_probe_timeout(),
            recovery_alerts_enabled: true,
            exclude_auto_renew: true,
            expiration_thresholds: default_expiration_thresholds(),
        }
    }
}

fn default_availability_interval() -> u64 {
    60
}

fn default_probe_timeout() -> u64 {
    15
}

fn default_expiration_thresholds() -> Vec<i64> {
    vec![30, 14, 7, 3, 1, 0]
}

/// Display timezone for rendered timestamps. Default GMT+7 (Asia/Jakarta).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemTimezone {
    #[serde(default = "default_tz_name")]
    pub name: String,
    #[serde(default = "default_tz_label")]
    pub label: String,
    #[serde(default = "default_tz_offset")]
    pub utc_offset_minutes: i32,
}

impl Default for SystemTimezone {
    fn default() -> Self {
        Self {
            name: default_tz_name(),
            label: default_tz_label(),
            utc_offset_minutes: default_tz_offset(),
        }
    }
}

impl SystemTimezone {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// "2026-08-01 14:03:00 GMT+7"
    pub fn format(&self, ts: DateTime<Utc>) -> String {
        let local = ts.with_timezone(&self.offset());
        format!("{} {}", local.format("%Y-%m-%d %H:%M:%S"), self.label)
    }

    pub fn format_date(&self, ts: DateTime<Utc>) -> String {
        ts.with_timezone(&self.offset()).format("%Y-%m-%d").to_string()
    }

    pub fn format_time(&self, ts: DateTime<Utc>) -> String {
        ts.with_timezone(&self.offset()).format("%H:%M:%S").to_string()
    }
}

fn default_tz_name() -> String {
    "Asia/Jakarta".to_string()
}

fn default_tz_label() -> String {
    "GMT+7".to_string()
}

fn default_tz_offset() -> i32 {
    7 * 60
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_interval_clamps_overrides() {
        let mut s = OptimizationReminderSettings::default();
        s.network_overrides.insert("net-1".to_string(), 45);
        s.network_overrides.insert("net-2".to_string(), 0);
        assert_eq!(s.interval_for("net-1"), 30);
        assert_eq!(s.interval_for("net-2"), 1);
        assert_eq!(s.interval_for("net-3"), 2);
    }

    #[test]
    fn timezone_formats_gmt7() {
        let tz = SystemTimezone::default();
        let ts = chrono::DateTime::parse_from_rfc3339("2026-08-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(tz.format(ts), "2026-08-01 17:00:00 GMT+7");
        assert_eq!(tz.format_date(ts), "2026-08-01");
    }

    #[test]
    fn digest_weekday_parses() {
        let mut s = WeeklyDigestSettings::default();
        assert_eq!(s.weekday(), Some(chrono::Weekday::Mon));
        s.schedule_day = "Sunday".to_string();
        assert_eq!(s.weekday(), Some(chrono::Weekday::Sun));
        s.schedule_day = "noday".to_string();
        assert_eq!(s.weekday(), None);
    }
}
