//! Weekly domain-health digest: one HTML email to the global admin list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use tracing::{info, warn};

use seonoc_common::settings::{
    SystemTimezone, WeeklyDigestSettings, KEY_SYSTEM_TIMEZONE, KEY_WEEKLY_DIGEST,
};
use seonoc_common::types::{AssetDomain, PingStatus};
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;

use crate::worker::sleep_with_cancel;

const WAKE_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Default)]
pub struct ExpiringGroups {
    /// ≤ 7 days or already expired.
    pub critical: Vec<(AssetDomain, i64)>,
    /// 8–14 days.
    pub high: Vec<(AssetDomain, i64)>,
    /// 15 days up to the threshold.
    pub medium: Vec<(AssetDomain, i64)>,
}

impl ExpiringGroups {
    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len()
    }
}

/// Group expiring domains by urgency band, each band sorted by urgency.
pub fn group_expiring(mut domains: Vec<(AssetDomain, i64)>) -> ExpiringGroups {
    domains.sort_by_key(|(_, days)| *days);
    let mut groups = ExpiringGroups::default();
    for (domain, days) in domains {
        if days <= 7 {
            groups.critical.push((domain, days));
        } else if days <= 14 {
            groups.high.push((domain, days));
        } else {
            groups.medium.push((domain, days));
        }
    }
    groups
}

/// Whether the digest should fire now: right weekday, past the scheduled
/// time, not already sent today.
pub fn is_due(
    settings: &WeeklyDigestSettings,
    now_local: DateTime<chrono::FixedOffset>,
    last_sent: Option<DateTime<Utc>>,
) -> bool {
    if !settings.enabled {
        return false;
    }
    let Some(weekday) = settings.weekday() else {
        return false;
    };
    if now_local.weekday() != weekday {
        return false;
    }
    let past_schedule = (now_local.hour(), now_local.minute())
        >= (u32::from(settings.schedule_hour), u32::from(settings.schedule_minute));
    if !past_schedule {
        return false;
    }
    match last_sent {
        Some(at) => now_local.with_timezone(&Utc) - at >= Duration::hours(24),
        None => true,
    }
}

/// (subject, html) for the digest email.
pub fn build_digest(
    expiring: &ExpiringGroups,
    down: &[AssetDomain],
    soft_blocked: &[AssetDomain],
) -> (String, String) {
    let total_issues = expiring.total() + down.len() + soft_blocked.len();
    let (health, color, emoji) = if !expiring.critical.is_empty() || !down.is_empty() {
        ("Needs Attention", "#dc2626", "🔴")
    } else if !expiring.high.is_empty() || !soft_blocked.is_empty() {
        ("Warning", "#f59e0b", "🟡")
    } else if total_issues > 0 {
        ("Minor Issues", "#3b82f6", "🔵")
    } else {
        ("All Clear", "#22c55e", "✅")
    };
    let subject = format!("[SEO-NOC] Weekly Domain Health Digest - {emoji} {health}");

    let tile = |value: usize, label: &str, value_color: &str| {
        format!(
            "<td style=\"text-align:center;padding:12px 20px;background:#262626;border-radius:6px;\">\
             <div style=\"font-size:24px;font-weight:bold;color:{value_color};\">{value}</div>\
             <div style=\"font-size:12px;color:#9ca3af;\">{label}</div></td>"
        )
    };

    let mut sections = vec![format!(
        "<div style=\"background:#1a1a1a;border-radius:8px;padding:16px;margin-bottom:20px;\">\
         <h3 style=\"color:#ffffff;margin:0 0 12px 0;\">Executive Summary</h3>\
         <table><tr>{}{}{}{}</tr></table></div>",
        tile(total_issues, "Total Issues", color),
        tile(expiring.critical.len(), "Critical Expiring", "#ef4444"),
        tile(down.len(), "Down", "#ef4444"),
        tile(soft_blocked.len(), "Soft Blocked", "#f59e0b"),
    )];

    let domain_rows = |items: &[(AssetDomain, i64)], tag: &str, tag_color: &str| -> String {
        let mut rows = format!(
            "<tr><td colspan=\"3\" style=\"padding:8px;color:{tag_color};font-weight:bold;\">{tag}</td></tr>"
        );
        for (domain, days) in items {
            let days_text = if *days >= 0 {
                format!("{days} days")
            } else {
                format!("EXPIRED {}d ago", days.abs())
            };
            rows.push_str(&format!(
                "<tr><td style=\"padding:8px;border-bottom:1px solid #333;font-family:monospace;\">{}</td>\
                 <td style=\"padding:8px;border-bottom:1px solid #333;color:#ef4444;\">{days_text}</td>\
                 <td style=\"padding:8px;border-bottom:1px solid #333;color:#6b7280;\">{}</td></tr>",
                domain.domain_name,
                domain
                    .expiration_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ));
        }
        rows
    };

    if expiring.total() > 0 {
        let mut rows = String::new();
        if !expiring.critical.is_empty() {
            rows.push_str(&domain_rows(&expiring.critical, "🔴 CRITICAL (≤7 days)", "#fca5a5"));
        }
        if !expiring.high.is_empty() {
            rows.push_str(&domain_rows(&expiring.high, "🟠 HIGH (8-14 days)", "#fdba74"));
        }
        if !expiring.medium.is_empty() {
            rows.push_str(&domain_rows(&expiring.medium, "🟡 MEDIUM (15-30 days)", "#fde68a"));
        }
        sections.push(format!(
            "<h3 style=\"color:#ffffff;\">Expiring Domains ({})</h3><table style=\"width:100%;\">{rows}</table>",
            expiring.total()
        ));
    }

    let status_section = |title: &str, items: &[AssetDomain], detail: fn(&AssetDomain) -> String| {
        let mut rows = String::new();
        for domain in items {
            rows.push_str(&format!(
                "<tr><td style=\"padding:8px;border-bottom:1px solid #333;font-family:monospace;\">{}</td>\
                 <td style=\"padding:8px;border-bottom:1px solid #333;color:#9ca3af;\">{}</td></tr>",
                domain.domain_name,
                detail(domain),
            ));
        }
        format!(
            "<h3 style=\"color:#ffffff;\">{title} ({})</h3><table style=\"width:100%;\">{rows}</table>",
            items.len()
        )
    };

    if !down.is_empty() {
        sections.push(status_section("Down Domains", down, |d| {
            d.last_http_code
                .map(|c| format!("HTTP {c}"))
                .unwrap_or_else(|| "unreachable".to_string())
        }));
    }
    if !soft_blocked.is_empty() {
        sections.push(status_section("Soft-Blocked Domains", soft_blocked, |d| {
            d.soft_block_type
                .map(|b| b.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string())
        }));
    }

    let html = format!(
        "<div style=\"background:#0d0d0d;color:#e5e5e5;padding:24px;font-family:sans-serif;\">\
         <h2 style=\"color:{color};\">{emoji} Weekly Domain Health Digest — {health}</h2>{}</div>",
        sections.join("\n")
    );
    (subject, html)
}

pub struct DigestWorker {
    store: StoreClient,
    router: Arc<NotificationRouter>,
    running: Arc<AtomicBool>,
}

impl DigestWorker {
    pub fn new(store: StoreClient, router: Arc<NotificationRouter>, running: Arc<AtomicBool>) -> Self {
        Self {
            store,
            router,
            running,
        }
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    pub async fn run(self) {
        info!("Digest worker started");
        while self.running.load(Ordering::Relaxed) {
            if let Err(e) = self.tick().await {
                warn!(error = %e, "Digest tick failed");
            }
            if !sleep_with_cancel(&self.running, StdDuration::from_secs(WAKE_INTERVAL_SECS)).await {
                break;
            }
        }
        info!("Digest worker stopped");
    }

    async fn tick(&self) -> anyhow::Result<()> {
        let mut settings: WeeklyDigestSettings =
            self.store.settings().get(KEY_WEEKLY_DIGEST).await?;
        let tz: SystemTimezone = self.store.settings().get(KEY_SYSTEM_TIMEZONE).await?;
        let now_local = Utc::now().with_timezone(&tz.offset());
        if !is_due(&settings, now_local, settings.last_sent_at) {
            return Ok(());
        }

        if self.send_digest(&settings).await? {
            settings.last_sent_at = Some(Utc::now());
            self.store
                .settings()
                .put(KEY_WEEKLY_DIGEST, &settings)
                .await?;
        }
        Ok(())
    }

    pub async fn send_digest(&self, settings: &WeeklyDigestSettings) -> anyhow::Result<bool> {
        let today = Utc::now().date_naive();

        let expiring = if settings.include_expiring_domains {
            let with_days: Vec<(AssetDomain, i64)> = self
                .store
                .domains()
                .find_with_expiration(true)
                .await?
                .into_iter()
                .filter_map(|d| {
                    let exp = d.expiration_date?;
                    let days = (exp.date_naive() - today).num_days();
                    (days <= settings.expiring_days_threshold).then_some((d, days))
                })
                .collect();
            group_expiring(with_days)
        } else {
            ExpiringGroups::default()
        };

        let down = if settings.include_down_domains {
            self.store
                .domains()
                .find_by_ping_status(PingStatus::Down)
                .await?
        } else {
            vec![]
        };
        let soft_blocked = if settings.include_soft_blocked {
            self.store
                .domains()
                .find_by_ping_status(PingStatus::SoftBlocked)
                .await?
        } else {
            vec![]
        };

        let (subject, html) = build_digest(&expiring, &down, &soft_blocked);
        let sent = self.router.send_admin_email(&subject, &html, None).await;
        if sent {
            info!(
                expiring = expiring.total(),
                down = down.len(),
                soft_blocked = soft_blocked.len(),
                "Weekly digest sent"
            );
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn domain(name: &str) -> AssetDomain {
        use seonoc_common::types::*;
        AssetDomain {
            id: name.to_string(),
            domain_name: name.to_string(),
            brand_id: "b".to_string(),
            category_id: None,
            registrar_id: None,
            status: DomainStatus::Active,
            expiration_date: None,
            auto_renew: false,
            monitoring_enabled: true,
            monitoring_interval: MonitoringInterval::Hourly,
            ping_status: PingStatus::Up,
            last_http_code: None,
            last_checked_at: None,
            soft_block_type: None,
            domain_lifecycle_status: LifecycleStatus::Active,
            quarantine_category: None,
            quarantined_by: None,
            quarantined_at: None,
            released_by: None,
            released_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn grouping_by_urgency_bands() {
        let groups = group_expiring(vec![
            (domain("a.com"), 3),
            (domain("b.com"), 10),
            (domain("c.com"), 25),
            (domain("d.com"), -2),
            (domain("e.com"), 7),
        ]);
        assert_eq!(groups.critical.len(), 3); // -2, 3, 7
        assert_eq!(groups.high.len(), 1);
        assert_eq!(groups.medium.len(), 1);
        // Sorted most urgent first.
        assert_eq!(groups.critical[0].1, -2);
    }

    #[test]
    fn subject_reflects_health() {
        let (subject, _) = build_digest(&ExpiringGroups::default(), &[], &[]);
        assert!(subject.contains("All Clear"));

        let groups = group_expiring(vec![(domain("a.com"), 2)]);
        let (subject, html) = build_digest(&groups, &[], &[]);
        assert!(subject.contains("Needs Attention"));
        assert!(html.contains("a.com"));
        assert!(html.contains("CRITICAL"));
    }

    #[test]
    fn digest_due_logic() {
        let mut settings = WeeklyDigestSettings {
            enabled: true,
            ..Default::default()
        };
        settings.schedule_day = "monday".to_string();
        settings.schedule_hour = 9;
        settings.schedule_minute = 0;
        let tz = chrono::FixedOffset::east_opt(7 * 3600).unwrap();

        // Monday 2026-08-03, 09:30 local.
        let monday_930 = tz.with_ymd_and_hms(2026, 8, 3, 9, 30, 0).unwrap();
        assert!(is_due(&settings, monday_930, None));

        // Before schedule time.
        let monday_850 = tz.with_ymd_and_hms(2026, 8, 3, 8, 50, 0).unwrap();
        assert!(!is_due(&settings, monday_850, None));

        // Wrong day.
        let tuesday = tz.with_ymd_and_hms(2026, 8, 4, 9, 30, 0).unwrap();
        assert!(!is_due(&settings, tuesday, None));

        // Already sent within 24h.
        let sent_at = monday_930.with_timezone(&Utc) - Duration::hours(1);
        assert!(!is_due(&settings, monday_930, Some(sent_at)));

        // Disabled.
        settings.enabled = false;
        assert!(!is_due(&settings, monday_930, None));
    }

    #[test]
    fn down_section_lists_http_code() {
        let mut d = domain("down.com");
        d.last_http_code = Some(503);
        let (_, html) = build_digest(&ExpiringGroups::default(), &[d], &[]);
        assert!(html.contains("down.com"));
        assert!(html.contains("HTTP 503"));
    }
}
