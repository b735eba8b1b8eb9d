//! Reminder schedulers: daily unmonitored-domain nags and periodic
//! in-progress-optimization reminders.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use seonoc_common::settings::{
    OptimizationReminderSettings, SystemTimezone, KEY_OPTIMIZATION_REMINDERS, KEY_SYSTEM_TIMEZONE,
};
use seonoc_common::throttle::{throttle_key, Throttle};
use seonoc_common::types::{AuditSeverity, EventType};
use seonoc_graph::enrich::network_snapshot_for;
use seonoc_graph::enrich_domain;
use seonoc_ledger::record_audit;
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;
use seonoc_templates::ContextBuilder;

use crate::alerts;
use crate::context::seo_maps;
use crate::worker::sleep_with_cancel;

const UNMONITORED_WAKE_SECS: u64 = 3600;
const UNMONITORED_STATE_KEY: &str = "unmonitored_reminders";
const OPTIMIZATION_WAKE_SECS: u64 = 3600;

/// A domain used in SEO structures with monitoring disabled.
#[derive(Debug, Clone, Serialize)]
pub struct UnmonitoredDomain {
    pub domain_id: String,
    pub domain_name: String,
    pub monitoring_enabled: bool,
    pub networks_used_in: Vec<String>,
    pub network_count: usize,
}

/// Compliance query: every domain that appears in any structure entry,
/// requires monitoring by lifecycle, and has it disabled.
pub async fn list_unmonitored(store: &StoreClient) -> anyhow::Result<Vec<UnmonitoredDomain>> {
    let entries = store.entries().find_all().await?;
    let mut networks_by_domain: HashMap<String, HashSet<String>> = HashMap::new();
    for entry in &entries {
        networks_by_domain
            .entry(entry.asset_domain_id.clone())
            .or_default()
            .insert(entry.network_id.clone());
    }
    let ids: Vec<String> = networks_by_domain.keys().cloned().collect();
    let domains = store.domains().find_by_ids(&ids).await?;

    let mut network_names: HashMap<String, String> = HashMap::new();
    for network in store.networks().list_all().await? {
        network_names.insert(network.id.clone(), network.name);
    }

    let mut result = Vec::new();
    for domain in domains {
        if domain.monitoring_enabled || !domain.requires_monitoring() {
            continue;
        }
        let networks: Vec<String> = networks_by_domain
            .get(&domain.id)
            .map(|set| {
                let mut names: Vec<String> = set
                    .iter()
                    .map(|id| network_names.get(id).cloned().unwrap_or_else(|| id.clone()))
                    .collect();
                names.sort();
                names
            })
            .unwrap_or_default();
        result.push(UnmonitoredDomain {
            domain_id: domain.id.clone(),
            domain_name: domain.domain_name.clone(),
            monitoring_enabled: false,
            network_count: networks.len(),
            networks_used_in: networks,
        });
    }
    result.sort_by(|a, b| a.domain_name.cmp(&b.domain_name));
    Ok(result)
}

/// Monitoring coverage over all domains used in SEO structures.
pub async fn coverage_summary(store: &StoreClient) -> anyhow::Result<serde_json::Value> {
    let entries = store.entries().find_all().await?;
    let ids: Vec<String> = entries
        .iter()
        .map(|e| e.asset_domain_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let domains = store.domains().find_by_ids(&ids).await?;
    let total = domains.len();
    let monitored = domains.iter().filter(|d| d.monitoring_enabled).count();
    let unmonitored = total - monitored;
    let coverage = if total == 0 {
        100.0
    } else {
        (monitored as f64 / total as f64 * 1000.0).round() / 10.0
    };
    Ok(serde_json::json!({
        "total_seo_domains": total,
        "monitored": monitored,
        "unmonitored": unmonitored,
        "monitoring_coverage": coverage,
    }))
}

pub struct UnmonitoredReminderWorker {
    store: StoreClient,
    router: Arc<NotificationRouter>,
    throttle: Arc<Throttle>,
    running: Arc<AtomicBool>,
}

impl UnmonitoredReminderWorker {
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
        info!("Unmonitored-domain reminder worker started");
        while self.running.load(Ordering::Relaxed) {
            match self.due().await {
                Ok(true) => match self.send_reminders().await {
                    Ok(sent) => {
                        if sent > 0 {
                            info!(sent, "Unmonitored-domain reminders sent");
                        }
                        if let Err(e) = self
                            .store
                            .scheduler_state()
                            .mark_run(UNMONITORED_STATE_KEY, Utc::now())
                            .await
                        {
                            warn!(error = %e, "Failed to mark reminder run");
                        }
                    }
                    Err(e) => warn!(error = %e, "Unmonitored reminder pass failed"),
                },
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Failed to read reminder scheduler state"),
            }
            if !sleep_with_cancel(&self.running, StdDuration::from_secs(UNMONITORED_WAKE_SECS))
                .await
            {
                break;
            }
        }
        info!("Unmonitored-domain reminder worker stopped");
    }

    async fn due(&self) -> anyhow::Result<bool> {
        let last = self
            .store
            .scheduler_state()
            .last_run(UNMONITORED_STATE_KEY)
            .await?;
        Ok(match last {
            Some(at) => Utc::now() - at >= Duration::hours(24),
            None => true,
        })
    }

    /// The reminder fires daily per domain until monitoring is enabled or
    /// the domain leaves every network.
    pub async fn send_reminders(&self) -> anyhow::Result<usize> {
        let unmonitored = list_unmonitored(&self.store).await?;
        if unmonitored.is_empty() {
            return Ok(0);
        }
        let (entries, names) = seo_maps(&self.store).await?;

        let mut sent = 0;
        for item in unmonitored {
            if !self.throttle.allow(
                &throttle_key("unmonitored", &item.domain_name),
                Duration::hours(24),
            ) {
                continue;
            }
            let ctx = enrich_domain(&item.domain_id, &entries, &names);
            let structure = ctx
                .references
                .first()
                .map(|r| network_snapshot_for(&r.network_id, &entries, &names))
                .unwrap_or_default();
            if self
                .router
                .send_monitoring_text(&alerts::unmonitored_alert(
                    &item.domain_name,
                    &ctx,
                    &structure,
                ))
                .await
            {
                sent += 1;
            }
        }
        Ok(sent)
    }
}

pub struct OptimizationReminderWorker {
    store: StoreClient,
    router: Arc<NotificationRouter>,
    running: Arc<AtomicBool>,
}

impl OptimizationReminderWorker {
    pub fn new(
        store: StoreClient,
        router: Arc<NotificationRouter>,
        running: Arc<AtomicBool>,
    ) -> Self {
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
        info!("Optimization reminder worker started");
        while self.running.load(Ordering::Relaxed) {
            match self.send_due_reminders().await {
                Ok(sent) if sent > 0 => info!(sent, "Optimization reminders sent"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Optimization reminder pass failed"),
            }
            if !sleep_with_cancel(&self.running, StdDuration::from_secs(OPTIMIZATION_WAKE_SECS))
                .await
            {
                break;
            }
        }
        info!("Optimization reminder worker stopped");
    }

    /// Nag every in-progress optimization past its network's reminder
    /// interval, tagging the network managers. Each send is logged for
    /// accountability.
    pub async fn send_due_reminders(&self) -> anyhow::Result<usize> {
        let settings: OptimizationReminderSettings = self
            .store
            .settings()
            .get(KEY_OPTIMIZATION_REMINDERS)
            .await?;
        if !settings.enabled {
            return Ok(0);
        }
        let tz: SystemTimezone = self.store.settings().get(KEY_SYSTEM_TIMEZONE).await?;
        let now = Utc::now();
        let mut sent = 0;

        for optimization in self.store.optimizations().list_in_progress().await? {
            let interval = Duration::days(settings.interval_for(&optimization.network_id));
            let reference = optimization
                .last_reminder_sent_at
                .unwrap_or(optimization.created_at);
            if now - reference < interval {
                continue;
            }

            let network = self
                .store
                .networks()
                .find_by_id(&optimization.network_id)
                .await?;
            let (network_name, managers) = network
                .map(|n| (n.name, n.manager_ids))
                .unwrap_or_else(|| ("Unknown".to_string(), vec![]));
            let brand_name = self
                .store
                .brands()
                .name_of(&optimization.brand_id)
                .await?;
            let days_in_progress = (now - optimization.created_at).num_days();

            let context = ContextBuilder::new(&tz)
                .network(&network_name, &optimization.network_id)
                .brand(&brand_name, &optimization.brand_id)
                .optimization(&optimization)
                .reminder(
                    days_in_progress,
                    &optimization.title,
                    optimization.status.label(),
                )
                .tagging(&[], &managers, &managers)
                .build();
            if self
                .router
                .send_event(EventType::SeoReminder, &context)
                .await
            {
                self.store
                    .optimizations()
                    .set_last_reminder(&optimization.id, now)
                    .await?;
                record_audit(
                    &self.store,
                    "optimization_reminder",
                    "system@seonoc.local",
                    &format!("seo_optimization:{}", optimization.id),
                    &format!(
                        "reminder sent for '{}' ({days_in_progress} days in progress)",
                        optimization.title
                    ),
                    AuditSeverity::Info,
                    true,
                )
                .await;
                sent += 1;
            }
        }
        Ok(sent)
    }
}
