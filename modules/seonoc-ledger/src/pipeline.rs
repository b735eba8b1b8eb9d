//! The change pipeline: every graph mutation flows through here.
//!
//! validate rationale → strict diff → persist entity → write ledger →
//! render → send → record delivery. The entity and ledger writes form a
//! logical unit; the notification is best-effort and never rolls the
//! business write back.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use seonoc_common::error::{NocError, NocResult};
use seonoc_common::paths::{node_label, normalize_path};
use seonoc_common::settings::{
    SystemTimezone, TelegramSeoSettings, KEY_SYSTEM_TIMEZONE, KEY_TELEGRAM_SEO,
};
use seonoc_common::throttle::{throttle_key, Throttle};
use seonoc_common::types::{
    ActionType, ActorRef, AssetDomain, AuditSeverity, ChangeLog, ChangeSnapshot, DomainRole,
    EntrySnapshot, EventType, IndexStatus, NetworkSnapshot, NodeStatus, NotificationStatus,
    SeoNetwork, Severity, StructureEntry, VisibilityMode,
};
use seonoc_graph::invariants::{validate_entry_delete, validate_entry_write};
use seonoc_graph::tiers::compute_tiers;
use seonoc_graph::{enrich::downstream_impact, snapshot::structure_snapshot};
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;
use seonoc_templates::ContextBuilder;

use crate::audit::record_audit;
use crate::diff::{classify_action, diff_snapshots, validate_change_note};

const NETWORK_NOTIFY_INTERVAL_SECS: i64 = 60;

/// Full node form, as submitted. Paths arrive raw and are normalized here.
#[derive(Debug, Clone)]
pub struct NodeInput {
    pub asset_domain_id: String,
    pub optimized_path: Option<String>,
    pub domain_role: DomainRole,
    pub domain_status: NodeStatus,
    pub index_status: IndexStatus,
    pub target_entry_id: Option<String>,
    pub ranking_position: Option<u8>,
    pub primary_keyword: String,
    pub ranking_url: String,
    pub notes: String,
    pub change_note: String,
}

#[derive(Debug, Clone)]
pub struct NewNetworkInput {
    pub brand_id: String,
    pub name: String,
    pub visibility_mode: VisibilityMode,
    pub manager_ids: Vec<String>,
    pub change_note: String,
}

pub struct ChangePipeline {
    store: StoreClient,
    router: Arc<NotificationRouter>,
    throttle: Arc<Throttle>,
}

impl ChangePipeline {
    pub fn new(store: StoreClient, router: Arc<NotificationRouter>, throttle: Arc<Throttle>) -> Self {
        Self {
            store,
            router,
            throttle,
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    // --- Operations ---

    pub async fn create_network(
        &self,
        actor: &ActorRef,
        input: NewNetworkInput,
    ) -> NocResult<SeoNetwork> {
        validate_change_note(&input.change_note)?;
        let brand = self
            .store
            .brands()
            .find_by_id(&input.brand_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("brand {}", input.brand_id)))?;

        let now = Utc::now();
        let network = SeoNetwork {
            id: Uuid::new_v4().to_string(),
            brand_id: brand.id.clone(),
            name: input.name.trim().to_string(),
            status: "active".to_string(),
            visibility_mode: input.visibility_mode,
            manager_ids: input.manager_ids,
            created_by: actor.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        if network.name.is_empty() {
            return Err(NocError::validation("network name is required"));
        }
        self.store.networks().insert(&network).await?;

        let log = self
            .write_ledger(
                &network,
                None,
                ActionType::CreateNetwork,
                network.name.clone(),
                actor,
                &input.change_note,
                None,
                Some(ChangeSnapshot::Network(NetworkSnapshot {
                    name: network.name.clone(),
                    brand_id: network.brand_id.clone(),
                    visibility_mode: network.visibility_mode,
                })),
            )
            .await?;

        let context = self
            .base_context(actor, &network, &brand.name)
            .await?
            .change(
                ActionType::CreateNetwork.as_str(),
                ActionType::CreateNetwork.label(),
                &input.change_note,
                "",
                "",
                "",
            )
            .structure(&self.structure_text(&network.id).await?, "", "")
            .build();
        self.deliver(&log, EventType::SeoNetworkCreated, &context, true)
            .await;

        record_audit(
            &self.store,
            "seo_change",
            &actor.email,
            &format!("seo_network:{}", network.id),
            &format!("created network '{}'", network.name),
            AuditSeverity::Info,
            true,
        )
        .await;

        Ok(network)
    }

    pub async fn create_node(
        &self,
        actor: &ActorRef,
        network_id: &str,
        input: NodeInput,
    ) -> NocResult<StructureEntry> {
        validate_change_note(&input.change_note)?;
        let (network, brand_name) = self.load_network(network_id).await?;
        let domain = self.load_domain(&input.asset_domain_id).await?;
        let existing = self.store.entries().find_by_network(network_id).await?;

        let now = Utc::now();
        let entry = StructureEntry {
            id: Uuid::new_v4().to_string(),
            network_id: network_id.to_string(),
            asset_domain_id: input.asset_domain_id.clone(),
            optimized_path: normalize_path(input.optimized_path.as_deref()),
            domain_role: input.domain_role,
            domain_status: input.domain_status,
            index_status: input.index_status,
            target_entry_id: input.target_entry_id.clone(),
            ranking_position: input.ranking_position,
            primary_keyword: input.primary_keyword.clone(),
            ranking_url: input.ranking_url.clone(),
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        validate_entry_write(&existing, &entry, &network, &domain)?;
        self.store.entries().insert(&entry).await?;

        let domains = self.domain_names(network_id).await?;
        let label = node_label(&domain.domain_name, entry.optimized_path.as_deref());
        let after = EntrySnapshot::from(&entry);
        let log = self
            .write_ledger(
                &network,
                Some(&entry.id),
                ActionType::CreateNode,
                label.clone(),
                actor,
                &input.change_note,
                None,
                Some(ChangeSnapshot::Entry(after.clone())),
            )
            .await?;

        let all = self.store.entries().find_by_network(network_id).await?;
        let target_label = resolve_target_label(after.target_entry_id.as_deref(), &all, &domains);
        let details = change_details(
            ActionType::CreateNode,
            &label,
            None,
            Some(&after),
            None,
            target_label.as_deref(),
        );
        let context = self
            .base_context(actor, &network, &brand_name)
            .await?
            .change(
                ActionType::CreateNode.as_str(),
                ActionType::CreateNode.label(),
                &input.change_note,
                "",
                "",
                &details,
            )
            .structure(&self.structure_text(network_id).await?, "", "")
            .build();
        self.deliver(&log, EventType::SeoChange, &context, false).await;

        record_audit(
            &self.store,
            "seo_change",
            &actor.email,
            &format!("seo_entry:{}", entry.id),
            &format!("created node {label}"),
            AuditSeverity::Info,
            true,
        )
        .await;

        Ok(entry)
    }

    pub async fn update_node(
        &self,
        actor: &ActorRef,
        entry_id: &str,
        input: NodeInput,
    ) -> NocResult<StructureEntry> {
        validate_change_note(&input.change_note)?;
        let existing_entry = self
            .store
            .entries()
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("structure entry {entry_id}")))?;
        let (network, brand_name) = self.load_network(&existing_entry.network_id).await?;
        // The domain of a node is immutable; moving a node to another domain
        // is a delete + create.
        let domain = self.load_domain(&existing_entry.asset_domain_id).await?;

        let mut updated = existing_entry.clone();
        updated.optimized_path = normalize_path(input.optimized_path.as_deref());
        updated.domain_role = input.domain_role;
        updated.domain_status = input.domain_status;
        updated.index_status = input.index_status;
        updated.target_entry_id = input.target_entry_id.clone();
        updated.ranking_position = input.ranking_position;
        updated.primary_keyword = input.primary_keyword.clone();
        updated.ranking_url = input.ranking_url.clone();
        updated.notes = input.notes.clone();

        let before = EntrySnapshot::from(&existing_entry);
        let after = EntrySnapshot::from(&updated);
        let changed = diff_snapshots(&before, &after);
        if changed.is_empty() {
            return Err(NocError::validation("no changes detected"));
        }
        let action = classify_action(&changed);

        let all = self
            .store
            .entries()
            .find_by_network(&existing_entry.network_id)
            .await?;
        validate_entry_write(&all, &updated, &network, &domain)?;

        updated.updated_at = Utc::now();
        self.store.entries().replace(&updated).await?;

        let domains = self.domain_names(&network.id).await?;
        let label = node_label(&domain.domain_name, updated.optimized_path.as_deref());
        let log = self
            .write_ledger(
                &network,
                Some(&updated.id),
                action,
                label.clone(),
                actor,
                &input.change_note,
                Some(ChangeSnapshot::Entry(before.clone())),
                Some(ChangeSnapshot::Entry(after.clone())),
            )
            .await?;

        let all = self.store.entries().find_by_network(&network.id).await?;
        let before_target = resolve_target_label(before.target_entry_id.as_deref(), &all, &domains);
        let after_target = resolve_target_label(after.target_entry_id.as_deref(), &all, &domains);
        let details = change_details(
            action,
            &label,
            Some(&before),
            Some(&after),
            before_target.as_deref(),
            after_target.as_deref(),
        );
        let context = self
            .base_context(actor, &network, &brand_name)
            .await?
            .change(
                action.as_str(),
                action.label(),
                &input.change_note,
                "",
                "",
                &details,
            )
            .structure(&self.structure_text(&network.id).await?, "", "")
            .build();
        self.deliver(&log, EventType::SeoChange, &context, action.bypasses_rate_limit())
            .await;

        record_audit(
            &self.store,
            "seo_change",
            &actor.email,
            &format!("seo_entry:{}", updated.id),
            &format!("{} on {label}", action.as_str()),
            AuditSeverity::Info,
            true,
        )
        .await;

        Ok(updated)
    }

    pub async fn delete_node(
        &self,
        actor: &ActorRef,
        entry_id: &str,
        change_note: &str,
    ) -> NocResult<()> {
        validate_change_note(change_note)?;
        let entry = self
            .store
            .entries()
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("structure entry {entry_id}")))?;
        let (network, brand_name) = self.load_network(&entry.network_id).await?;
        let all = self.store.entries().find_by_network(&entry.network_id).await?;
        validate_entry_delete(&all, &entry)?;

        // Capture the pre-deletion picture while the node still exists.
        let domains = self.domain_names(&network.id).await?;
        let structure_before = {
            let tiers = compute_tiers(&all);
            structure_snapshot(&all, &domains, &tiers)
        };
        let (downstream, _) = downstream_impact(&entry.id, &all);
        let before = EntrySnapshot::from(&entry);
        let domain_name = domains
            .get(&entry.asset_domain_id)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let label = node_label(&domain_name, entry.optimized_path.as_deref());
        let target_label = resolve_target_label(before.target_entry_id.as_deref(), &all, &domains);

        self.store.entries().delete(&entry.id).await?;

        let log = self
            .write_ledger(
                &network,
                Some(&entry.id),
                ActionType::DeleteNode,
                label.clone(),
                actor,
                change_note,
                Some(ChangeSnapshot::Entry(before.clone())),
                None,
            )
            .await?;

        let severity = if entry.domain_role == DomainRole::Main {
            Severity::Critical
        } else if downstream.len() >= 3 {
            Severity::High
        } else {
            Severity::Medium
        };
        let context = self
            .base_context(actor, &network, &brand_name)
            .await?
            .node(
                &domain_name,
                entry.optimized_path.as_deref().unwrap_or(""),
                entry.domain_role.label(),
                serde_json::json!(""),
                entry.domain_status.label(),
                entry.index_status.label(),
                target_label.as_deref().unwrap_or("-"),
                &entry.id,
            )
            .change(
                ActionType::DeleteNode.as_str(),
                ActionType::DeleteNode.label(),
                change_note,
                "",
                "",
                "",
            )
            .impact(severity, "authority flow interrupted", downstream.len())
            .structure(&structure_before, "", "")
            .build();
        self.deliver(&log, EventType::SeoNodeDeleted, &context, true).await;

        record_audit(
            &self.store,
            "seo_change",
            &actor.email,
            &format!("seo_entry:{}", entry.id),
            &format!("deleted node {label}"),
            AuditSeverity::Warning,
            true,
        )
        .await;

        Ok(())
    }

    /// Atomic main switch: demote the old main, promote the new one,
    /// recompute tiers. Each step writes its own ledger entry under the
    /// shared rationale.
    pub async fn switch_main(
        &self,
        actor: &ActorRef,
        network_id: &str,
        new_main_id: &str,
        change_note: &str,
    ) -> NocResult<()> {
        validate_change_note(change_note)?;
        let (network, brand_name) = self.load_network(network_id).await?;
        let all = self.store.entries().find_by_network(network_id).await?;

        let old_main = all
            .iter()
            .find(|e| e.domain_role == DomainRole::Main)
            .cloned()
            .ok_or_else(|| NocError::Conflict("network has no main node".to_string()))?;
        let new_main = all
            .iter()
            .find(|e| e.id == new_main_id)
            .cloned()
            .ok_or_else(|| NocError::not_found(format!("structure entry {new_main_id}")))?;
        if old_main.id == new_main.id {
            return Err(NocError::validation("node is already the main"));
        }

        let domains = self.domain_names(network_id).await?;

        // Step 1: demote the old main into a canonical supporter of the new.
        let mut demoted = old_main.clone();
        demoted.domain_role = DomainRole::Supporting;
        demoted.domain_status = NodeStatus::Canonical;
        demoted.target_entry_id = Some(new_main.id.clone());
        demoted.updated_at = Utc::now();
        self.store.entries().replace(&demoted).await?;
        let old_label = node_label(
            domains
                .get(&old_main.asset_domain_id)
                .map(String::as_str)
                .unwrap_or("unknown"),
            old_main.optimized_path.as_deref(),
        );
        let demote_log = self
            .write_ledger(
                &network,
                Some(&old_main.id),
                ActionType::ChangeRole,
                old_label.clone(),
                actor,
                change_note,
                Some(ChangeSnapshot::Entry(EntrySnapshot::from(&old_main))),
                Some(ChangeSnapshot::Entry(EntrySnapshot::from(&demoted))),
            )
            .await?;

        // Step 2: promote the new main.
        let mut promoted = new_main.clone();
        promoted.domain_role = DomainRole::Main;
        promoted.domain_status = NodeStatus::Primary;
        promoted.target_entry_id = None;
        promoted.updated_at = Utc::now();
        self.store.entries().replace(&promoted).await?;
        let new_label = node_label(
            domains
                .get(&new_main.asset_domain_id)
                .map(String::as_str)
                .unwrap_or("unknown"),
            new_main.optimized_path.as_deref(),
        );
        let promote_log = self
            .write_ledger(
                &network,
                Some(&new_main.id),
                ActionType::ChangeRole,
                new_label.clone(),
                actor,
                change_note,
                Some(ChangeSnapshot::Entry(EntrySnapshot::from(&new_main))),
                Some(ChangeSnapshot::Entry(EntrySnapshot::from(&promoted))),
            )
            .await?;

        // Step 3: recompute tiers over the final shape.
        let refreshed = self.store.entries().find_by_network(network_id).await?;
        let tiers = compute_tiers(&refreshed);
        info!(
            network = %network.name,
            new_main = %new_label,
            orphans = tiers.orphans().len(),
            "Main switch complete"
        );

        let structure = structure_snapshot(&refreshed, &domains, &tiers);
        for (log, label, before_label, after_label) in [
            (&demote_log, &old_label, "Main (LP)", "Supporting"),
            (&promote_log, &new_label, "Supporting", "Main (LP)"),
        ] {
            let details = format!(
                "🔄 <b>Change Details:</b>\n• Node: {label}\n• Previous Role: {before_label}\n• New Role: {after_label}"
            );
            let context = self
                .base_context(actor, &network, &brand_name)
                .await?
                .change(
                    ActionType::ChangeRole.as_str(),
                    ActionType::ChangeRole.label(),
                    change_note,
                    before_label,
                    after_label,
                    &details,
                )
                .structure(&structure, "", "")
                .build();
            self.deliver(log, EventType::SeoChange, &context, true).await;
        }

        record_audit(
            &self.store,
            "seo_change",
            &actor.email,
            &format!("seo_network:{}", network.id),
            &format!("main switched from {old_label} to {new_label}"),
            AuditSeverity::Warning,
            true,
        )
        .await;

        Ok(())
    }

    /// Operator-triggered re-send for a ledger row whose notification
    /// failed. There is no automatic retry queue.
    pub async fn retry_notification(&self, log_id: &str) -> NocResult<bool> {
        let log = self
            .store
            .change_logs()
            .find_by_id(log_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("change log {log_id}")))?;
        let network = self
            .store
            .networks()
            .find_by_id(&log.network_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("network {}", log.network_id)))?;
        let brand_name = self.store.brands().name_of(&network.brand_id).await?;

        let actor = ActorRef {
            user_id: log.actor_user_id.clone(),
            email: log.actor_email.clone(),
            display_name: String::new(),
        };
        let context = self
            .base_context(&actor, &network, &brand_name)
            .await?
            .change(
                log.action_type.as_str(),
                log.action_type.label(),
                &log.change_note,
                "",
                "",
                &format!("• Node: {}", log.affected_node),
            )
            .structure(&self.structure_text(&network.id).await?, "", "")
            .build();
        let event = match log.action_type {
            ActionType::CreateNetwork => EventType::SeoNetworkCreated,
            ActionType::DeleteNode => EventType::SeoNodeDeleted,
            _ => EventType::SeoChange,
        };
        self.deliver(&log, event, &context, true).await;
        let refreshed = self.store.change_logs().find_by_id(log_id).await?;
        Ok(refreshed
            .map(|l| l.notification_status == NotificationStatus::Success)
            .unwrap_or(false))
    }

    // --- Internals ---

    async fn load_network(&self, network_id: &str) -> NocResult<(SeoNetwork, String)> {
        let network = self
            .store
            .networks()
            .find_by_id(network_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("network {network_id}")))?;
        let brand_name = self.store.brands().name_of(&network.brand_id).await?;
        Ok((network, brand_name))
    }

    async fn load_domain(&self, domain_id: &str) -> NocResult<AssetDomain> {
        self.store
            .domains()
            .find_by_id(domain_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("domain {domain_id}")))
    }

    async fn domain_names(&self, network_id: &str) -> NocResult<HashMap<String, String>> {
        let entries = self.store.entries().find_by_network(network_id).await?;
        let ids: Vec<String> = entries
            .iter()
            .map(|e| e.asset_domain_id.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        let domains = self.store.domains().find_by_ids(&ids).await?;
        Ok(domains.into_iter().map(|d| (d.id, d.domain_name)).collect())
    }

    async fn structure_text(&self, network_id: &str) -> NocResult<String> {
        let entries = self.store.entries().find_by_network(network_id).await?;
        let domains = self.domain_names(network_id).await?;
        let tiers = compute_tiers(&entries);
        Ok(structure_snapshot(&entries, &domains, &tiers))
    }

    async fn base_context(
        &self,
        actor: &ActorRef,
        network: &SeoNetwork,
        brand_name: &str,
    ) -> NocResult<ContextBuilder> {
        let tz: SystemTimezone = self.store.settings().get(KEY_SYSTEM_TIMEZONE).await?;
        let chat: TelegramSeoSettings = self.store.settings().get(KEY_TELEGRAM_SEO).await?;
        Ok(ContextBuilder::new(&tz)
            .actor(actor, "")
            .network(&network.name, &network.id)
            .brand(brand_name, &network.brand_id)
            .tagging(&chat.leader_usernames, &[], &[]))
    }

    /// Step 4 of the pipeline. A ledger failure after the entity write is
    /// the one inconsistency we surface loudly instead of hiding.
    #[allow(clippy::too_many_arguments)]
    async fn write_ledger(
        &self,
        network: &SeoNetwork,
        entry_id: Option<&str>,
        action_type: ActionType,
        affected_node: String,
        actor: &ActorRef,
        change_note: &str,
        before: Option<ChangeSnapshot>,
        after: Option<ChangeSnapshot>,
    ) -> NocResult<ChangeLog> {
        let log = ChangeLog {
            id: Uuid::new_v4().to_string(),
            network_id: network.id.clone(),
            brand_id: network.brand_id.clone(),
            entry_id: entry_id.map(str::to_string),
            action_type,
            affected_node,
            actor_user_id: actor.user_id.clone(),
            actor_email: actor.email.clone(),
            change_note: change_note.trim().to_string(),
            before_snapshot: before,
            after_snapshot: after,
            created_at: Utc::now(),
            notification_status: NotificationStatus::Pending,
            archived: false,
        };
        if let Err(e) = self.store.change_logs().insert(&log).await {
            record_audit(
                &self.store,
                "ledger_write_failed",
                &actor.email,
                &format!("seo_network:{}", network.id),
                &format!("entity write for {:?} has no ledger row: {e}", log.entry_id),
                AuditSeverity::Error,
                false,
            )
            .await;
            return Err(NocError::Internal(anyhow!(
                "ledger write failed after entity write: {e}"
            )));
        }
        Ok(log)
    }

    /// Steps 5–7: render, send, record delivery. Rate-limited sends stay
    /// `pending`; failed sends are flagged for operator action.
    async fn deliver(
        &self,
        log: &ChangeLog,
        event: EventType,
        context: &serde_json::Value,
        bypass_rate_limit: bool,
    ) {
        let key = throttle_key("net", &log.network_id);
        if !bypass_rate_limit
            && !self
                .throttle
                .allow(&key, Duration::seconds(NETWORK_NOTIFY_INTERVAL_SECS))
        {
            info!(network_id = %log.network_id, "Notification rate-limited, leaving pending");
            return;
        }

        let sent = self.router.send_event(event, context).await;
        let status = if sent {
            NotificationStatus::Success
        } else {
            NotificationStatus::Failed
        };
        if let Err(e) = self
            .store
            .change_logs()
            .set_notification_status(&log.id, status)
            .await
        {
            warn!(error = %e, log_id = %log.id, "Failed to record delivery state");
        }
        if !sent {
            record_audit(
                &self.store,
                "notification_failed",
                &log.actor_email,
                &format!("change_log:{}", log.id),
                &format!("{} notification failed for {}", event.as_str(), log.affected_node),
                AuditSeverity::Warning,
                false,
            )
            .await;
        }
    }
}

/// Target label in simple form (domain/path, no status) for change details.
fn resolve_target_label(
    target_entry_id: Option<&str>,
    entries: &[StructureEntry],
    domains: &HashMap<String, String>,
) -> Option<String> {
    let target_id = target_entry_id?;
    let target = entries.iter().find(|e| e.id == target_id)?;
    let domain_name = domains
        .get(&target.asset_domain_id)
        .map(String::as_str)
        .unwrap_or("unknown");
    Some(node_label(domain_name, target.optimized_path.as_deref()))
}

/// Human-readable change-details block for the chat message.
fn change_details(
    action: ActionType,
    affected_node: &str,
    before: Option<&EntrySnapshot>,
    after: Option<&EntrySnapshot>,
    before_target: Option<&str>,
    after_target: Option<&str>,
) -> String {
    let mut lines = vec![
        "🔄 <b>Change Details:</b>".to_string(),
        format!("• Node: {affected_node}"),
    ];

    match action {
        ActionType::CreateNode => {
            if let Some(after) = after {
                lines.push(format!("• Role: {}", after.domain_role.label()));
                lines.push(format!("• Status: {}", after.domain_status.label()));
                lines.push(format!("• Index: {}", after.index_status.label()));
                if let Some(target) = after_target {
                    lines.push(format!("• Target: {target}"));
                }
            }
        }
        ActionType::DeleteNode => {
            if let Some(before) = before {
                lines.push(format!("• Role (before deletion): {}", before.domain_role.label()));
                lines.push(format!(
                    "• Status (before deletion): {}",
                    before.domain_status.label()
                ));
            }
            lines.push("• Current Status: <b>DELETED</b>".to_string());
        }
        ActionType::RelinkNode => {
            let snapshot = after.or(before);
            if let Some(s) = snapshot {
                lines.push(format!("• Role: {}", s.domain_role.label()));
                lines.push(format!("• Status: {}", s.domain_status.label()));
            }
            lines.push(format!("• Previous Target: {}", before_target.unwrap_or("-")));
            lines.push(format!("• New Target: {}", after_target.unwrap_or("-")));
        }
        ActionType::ChangeRole => {
            let before_role = before.map(|s| s.domain_role.label()).unwrap_or("-");
            let after_role = after.map(|s| s.domain_role.label()).unwrap_or("-");
            let after_status = after.map(|s| s.domain_status.label()).unwrap_or("-");
            lines.push(format!("• Previous Role: {before_role}"));
            lines.push(format!("• New Role: {after_role}"));
            lines.push(format!("• Status: {after_status}"));
        }
        ActionType::ChangePath => {
            let before_path = before
                .and_then(|s| s.optimized_path.clone())
                .unwrap_or_else(|| "/".to_string());
            let after_path = after
                .and_then(|s| s.optimized_path.clone())
                .unwrap_or_else(|| "/".to_string());
            lines.push(format!("• Previous Path: {before_path}"));
            lines.push(format!("• New Path: {after_path}"));
        }
        ActionType::UpdateNode | ActionType::CreateNetwork => {
            if let (Some(before), Some(after)) = (before, after) {
                lines.push(String::new());
                lines.push("<b>Before:</b>".to_string());
                lines.push(format!("  • Role: {}", before.domain_role.label()));
                lines.push(format!("  • Status: {}", before.domain_status.label()));
                lines.push(format!("  • Index: {}", before.index_status.label()));
                if let Some(target) = before_target {
                    lines.push(format!("  • Target: {target}"));
                }
                lines.push(String::new());
                lines.push("<b>After:</b>".to_string());
                lines.push(format!("  • Role: {}", after.domain_role.label()));
                lines.push(format!("  • Status: {}", after.domain_status.label()));
                lines.push(format!("  • Index: {}", after.index_status.label()));
                if let Some(target) = after_target {
                    lines.push(format!("  • Target: {target}"));
                }
            }
        }
    }

    lines.join("\n")
}
