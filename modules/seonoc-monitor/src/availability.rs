//! Availability engine: interval scheduler, bounded probe pool, transition
//! alerting with 24 h per-(domain, alert type) dedup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use futures::{stream, StreamExt};
use tracing::{info, warn};

use seonoc_common::settings::{MonitoringConfig, KEY_MONITORING_CONFIG};
use seonoc_common::throttle::{throttle_key, Throttle};
use seonoc_common::types::{AssetDomain, EventType, PingStatus, Severity};
use seonoc_graph::enrich_domain;
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;

use crate::alerts;
use crate::context::{alert_email_html, monitoring_context, seo_maps};
use crate::probe::{HttpProber, ProbeOutcome};
use crate::worker::sleep_with_cancel;

const PROBE_POOL_SIZE: usize = 25;
const ALERT_DEDUP_HOURS: i64 = 24;

pub struct AvailabilityWorker {
    store: StoreClient,
    router: Arc<NotificationRouter>,
    throttle: Arc<Throttle>,
    running: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
pub struct PassStats {
    pub probed: usize,
    pub alerts: usize,
}

impl AvailabilityWorker {
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

    pub async fn run(self) {
        info!("Availability worker started");
        while self.running.load(Ordering::Relaxed) {
            let config: MonitoringConfig = match self
                .store
                .settings()
                .get(KEY_MONITORING_CONFIG)
                .await
            {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "Failed to read monitoring config");
                    MonitoringConfig::default()
                }
            };
            match self.run_pass(&config).await {
                Ok(stats) if stats.probed > 0 => {
                    info!(probed = stats.probed, alerts = stats.alerts, "Availability pass complete");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Availability pass failed"),
            }
            if !sleep_with_cancel(
                &self.running,
                StdDuration::from_secs(config_interval(&self.store).await),
            )
            .await
            {
                break;
            }
        }
        info!("Availability worker stopped");
    }

    /// One scheduler wake-up: probe every due domain through a bounded
    /// pool. Each domain appears at most once per pass, so a domain is
    /// never probed concurrently with itself.
    pub async fn run_pass(&self, config: &MonitoringConfig) -> anyhow::Result<PassStats> {
        let now = Utc::now();
        let due: Vec<AssetDomain> = self
            .store
            .domains()
            .find_monitored()
            .await?
            .into_iter()
            .filter(|d| match d.last_checked_at {
                Some(checked) => checked + d.monitoring_interval.as_duration() <= now,
                None => true,
            })
            .collect();
        if due.is_empty() {
            return Ok(PassStats::default());
        }

        let prober = HttpProber::new(config.probe_timeout_secs);
        let results: Vec<(AssetDomain, ProbeOutcome)> = stream::iter(due)
            .map(|domain| {
                let prober = &prober;
                async move {
                    let outcome = prober.probe(&domain.domain_name).await;
                    (domain, outcome)
                }
            })
            .buffer_unordered(PROBE_POOL_SIZE)
            .collect()
            .await;

        let mut stats = PassStats {
            probed: results.len(),
            alerts: 0,
        };
        for (domain, outcome) in results {
            let previous = domain.ping_status;
            self.store
                .domains()
                .record_probe(
                    &domain.id,
                    outcome.status,
                    outcome.http_code,
                    outcome.soft_block,
                    Utc::now(),
                )
                .await?;

            if self
                .handle_transition(&domain, previous, &outcome, config)
                .await?
            {
                stats.alerts += 1;
            }
        }
        Ok(stats)
    }

    async fn handle_transition(
        &self,
        domain: &AssetDomain,
        previous: PingStatus,
        outcome: &ProbeOutcome,
        config: &MonitoringConfig,
    ) -> anyhow::Result<bool> {
        let dedup = Duration::hours(ALERT_DEDUP_HOURS);
        match outcome.status {
            PingStatus::Down if previous != PingStatus::Down => {
                if !self
                    .throttle
                    .allow(&throttle_key("down", &domain.domain_name), dedup)
                {
                    return Ok(false);
                }
                self.send_down_alert(domain, outcome).await;
                Ok(true)
            }
            PingStatus::SoftBlocked if previous != PingStatus::SoftBlocked => {
                if !self
                    .throttle
                    .allow(&throttle_key("soft_blocked", &domain.domain_name), dedup)
                {
                    return Ok(false);
                }
                self.send_soft_block_alert(domain, outcome).await;
                Ok(true)
            }
            PingStatus::Up
                if matches!(previous, PingStatus::Down | PingStatus::SoftBlocked)
                    && config.recovery_alerts_enabled =>
            {
                if !self
                    .throttle
                    .allow(&throttle_key("recovery", &domain.domain_name), dedup)
                {
                    return Ok(false);
                }
                self.router
                    .send_monitoring_text(&alerts::recovery_alert(&domain.domain_name, previous))
                    .await;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Down alerts carry the full SEO context; severity is the enricher's,
    /// floored at HIGH.
    async fn send_down_alert(&self, domain: &AssetDomain, outcome: &ProbeOutcome) {
        let (entries, names) = match seo_maps(&self.store).await {
            Ok(maps) => maps,
            Err(e) => {
                warn!(error = %e, "Failed to load SEO maps for down alert");
                return;
            }
        };
        let ctx = enrich_domain(&domain.id, &entries, &names);
        let severity = ctx.severity.max(Severity::High);

        let context = match monitoring_context(
            &self.store,
            domain,
            &ctx,
            severity,
            &entries,
            &names,
            None,
            outcome.reason.as_deref(),
        )
        .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to build down-alert context");
                return;
            }
        };
        self.router
            .send_monitoring_event(EventType::DomainDown, &context)
            .await;
        self.router
            .send_admin_email(
                &alerts::email_subject("Domain Down", &domain.domain_name, severity),
                &alert_email_html(
                    "Domain Down",
                    &domain.domain_name,
                    severity,
                    outcome.reason.as_deref().unwrap_or("unreachable"),
                ),
                Some(severity),
            )
            .await;
    }

    /// Soft blocks are WARNING-grade: reachable, but functionally degraded.
    async fn send_soft_block_alert(&self, domain: &AssetDomain, outcome: &ProbeOutcome) {
        let Some(block) = outcome.soft_block else { return };
        let (entries, names) = match seo_maps(&self.store).await {
            Ok(maps) => maps,
            Err(e) => {
                warn!(error = %e, "Failed to load SEO maps for soft-block alert");
                return;
            }
        };
        let ctx = enrich_domain(&domain.id, &entries, &names);
        let structure = ctx
            .references
            .first()
            .map(|r| {
                seonoc_graph::enrich::network_snapshot_for(&r.network_id, &entries, &names)
            })
            .unwrap_or_default();
        self.router
            .send_monitoring_text(&alerts::soft_block_alert(
                &domain.domain_name,
                block,
                outcome.http_code,
                &ctx,
                &structure,
            ))
            .await;
    }
}

async fn config_interval(store: &StoreClient) -> u64 {
    store
        .settings()
        .get::<MonitoringConfig>(KEY_MONITORING_CONFIG)
        .await
        .map(|c| c.availability_interval_secs.max(5))
        .unwrap_or(60)
}
