//! Expiration engine: daily pass over every domain with a known expiration
//! date, threshold alerting at {30, 14, 7, 3, 1, 0} days and every day once
//! expired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use seonoc_common::settings::{MonitoringConfig, KEY_MONITORING_CONFIG};
use seonoc_common::throttle::{throttle_key, Throttle};
use seonoc_common::types::{AssetDomain, EventType, Severity};
use seonoc_graph::enrich_domain;
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;

use crate::alerts;
use crate::context::{alert_email_html, monitoring_context, seo_maps};
use crate::worker::sleep_with_cancel;

const WAKE_INTERVAL_SECS: u64 = 3600;
const STATE_KEY: &str = "expiration_daily";

pub struct ExpirationWorker {
    store: StoreClient,
    router: Arc<NotificationRouter>,
    throttle: Arc<Throttle>,
    running: Arc<AtomicBool>,
}

impl ExpirationWorker {
    pub fn new(
        store: StoreClient,
        router: Arc<NotificationRouter>,
        throttle: Arc<Throttle>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            router,
            throttle,
            running,
        }
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Hourly wake-ups; effective work gated to once per calendar day.
    /// The first wake-up after startup runs immediately (per-domain dedup
    /// keeps that from double-alerting).
    pub async fn run(self) {
        info!("Expiration worker started");
        while self.running.load(Ordering::Relaxed) {
            match self.due_today().await {
                Ok(true) => match self.run_pass().await {
                    Ok(alerts) => {
                        if alerts > 0 {
                            info!(alerts, "Expiration pass complete");
                        }
                        if let Err(e) = self
                            .store
                            .scheduler_state()
                            .mark_run(STATE_KEY, Utc::now())
                            .await
                        {
                            warn!(error = %e, "Failed to mark expiration run");
                        }
                    }
                    Err(e) => warn!(error = %e, "Expiration pass failed"),
                },
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Failed to read expiration scheduler state"),
            }
            if !sleep_with_cancel(&self.running, StdDuration::from_secs(WAKE_INTERVAL_SECS)).await
            {
                break;
            }
        }
        info!("Expiration worker stopped");
    }

    async fn due_today(&self) -> anyhow::Result<bool> {
        let last = self.store.scheduler_state().last_run(STATE_KEY).await?;
        Ok(match last {
            Some(at) => at.date_naive() < Utc::now().date_naive(),
            None => true,
        })
    }

    pub async fn run_pass(&self) -> anyhow::Result<usize> {
        let config: MonitoringConfig = self.store.settings().get(KEY_MONITORING_CONFIG).await?;
        let domains = self
            .store
            .domains()
            .find_with_expiration(config.exclude_auto_renew)
            .await?;
        if domains.is_empty() {
            return Ok(0);
        }

        let (entries, names) = seo_maps(&self.store).await?;
        let today = Utc::now().date_naive();
        let mut alerts_sent = 0;

        for domain in domains {
            let Some(expiration) = domain.expiration_date else { continue };
            let days_remaining = (expiration.date_naive() - today).num_days();

            if !should_alert(days_remaining, &config.expiration_thresholds) {
                continue;
            }
            if !self.throttle.allow(
                &expiry_dedup_key(&domain.domain_name, days_remaining),
                Duration::hours(24),
            ) {
                continue;
            }

            let ctx = enrich_domain(&domain.id, &entries, &names);
            let severity = expiration_severity(days_remaining, ctx.used_in_seo, ctx.severity);

            let context = monitoring_context(
                &self.store,
                &domain,
                &ctx,
                severity,
                &entries,
                &names,
                Some(days_remaining),
                None,
            )
            .await?;
            self.router
                .send_monitoring_event(EventType::DomainExpiration, &context)
                .await;
            self.router
                .send_admin_email(
                    &alerts::email_subject("Domain Expiring", &domain.domain_name, severity),
                    &alert_email_html(
                        "Domain Expiring",
                        &domain.domain_name,
                        severity,
                        &format!("{days_remaining} day(s) remaining"),
                    ),
                    Some(severity),
                )
                .await;
            alerts_sent += 1;
        }
        Ok(alerts_sent)
    }
}

/// Alert at the configured thresholds and every day once expired.
pub fn should_alert(days_remaining: i64, thresholds: &[i64]) -> bool {
    days_remaining < 0 || thresholds.contains(&days_remaining)
}

/// Dedup key: per threshold when far out, per domain per day inside the
/// final week.
pub fn expiry_dedup_key(domain_name: &str, days_remaining: i64) -> String {
    if days_remaining >= 7 {
        throttle_key("expire", &format!("{domain_name}:{days_remaining}"))
    } else {
        throttle_key("expire", domain_name)
    }
}

/// CRITICAL when expired or nearly so with SEO impact; otherwise the base
/// enricher severity elevated by the days-remaining band.
pub fn expiration_severity(days_remaining: i64, used_in_seo: bool, base: Severity) -> Severity {
    if days_remaining <= 3 && used_in_seo {
        return Severity::Critical;
    }
    if days_remaining <= 7 {
        return base.max(Severity::High);
    }
    if days_remaining <= 14 {
        return base.max(Severity::Medium);
    }
    base
}
