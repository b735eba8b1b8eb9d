//! Conflict ↔ optimization linking: every detected conflict becomes a
//! trackable remediation task, with fingerprint-based recurrence detection
//! and two-way status synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use bson::{doc, Bson};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use seonoc_common::error::{NocError, NocResult};
use seonoc_common::types::{
    ActorRef, AffectedScope, AuditSeverity, Conflict, ConflictStatus, ExpectedImpact,
    Optimization, OptimizationStatus, TopicFamily,
};
use seonoc_graph::DetectedConflict;
use seonoc_ledger::record_audit;
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;

use crate::fingerprint::fingerprint_of;
use crate::messages;

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct LinkerSummary {
    pub processed: usize,
    pub new_conflicts: usize,
    pub recurring_conflicts: usize,
    pub optimizations_created: usize,
    pub notifications_sent: usize,
}

pub struct ConflictLinker {
    store: StoreClient,
    router: Arc<NotificationRouter>,
}

impl ConflictLinker {
    pub fn new(store: StoreClient, router: Arc<NotificationRouter>) -> Self {
        Self { store, router }
    }

    /// Ingest one detection run for a network.
    ///
    /// Unknown fingerprint → store + linked optimization + notification.
    /// Known fingerprint in a settled state → recurrence (reopen, fresh
    /// optimization). Known fingerprint still open → touch updated_at only.
    pub async fn process_detections(
        &self,
        network_id: &str,
        detections: &[DetectedConflict],
    ) -> NocResult<LinkerSummary> {
        let now = Utc::now();
        let mut summary = LinkerSummary {
            processed: detections.len(),
            ..Default::default()
        };

        let network = self
            .store
            .networks()
            .find_by_id(network_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("network {network_id}")))?;
        let existing = self.store.conflicts().find_by_network(network_id).await?;
        let by_fingerprint: HashMap<String, &Conflict> = existing
            .iter()
            .map(|c| (c.fingerprint.clone(), c))
            .collect();

        // Detectors can emit several findings with the same structural
        // identity (three nodes sharing a keyword produce three pairs);
        // only the first one per fingerprint is ingested.
        let mut seen_this_batch: std::collections::HashSet<String> =
            std::collections::HashSet::new();

        for detected in detections {
            let fingerprint = fingerprint_of(detected);
            if !seen_this_batch.insert(fingerprint.clone()) {
                continue;
            }

            match by_fingerprint.get(&fingerprint) {
                Some(known) if known.status.is_settled() => {
                    // Recurrence: the structure regressed after being
                    // resolved, approved or ignored.
                    summary.recurring_conflicts += 1;
                    let count = known.recurrence_count + 1;
                    self.store
                        .conflicts()
                        .apply(
                            &known.id,
                            doc! {
                                "status": "detected",
                                "is_active": true,
                                "recurrence_count": count as i64,
                                "last_recurrence_at": bson_ts(&now)?,
                                "detected_at": bson_ts(&now)?,
                                "updated_at": bson_ts(&now)?,
                                "optimization_id": Bson::Null,
                            },
                        )
                        .await?;

                    let optimization = self
                        .create_linked_optimization(&known.id, detected, &network.brand_id, Some(count))
                        .await?;
                    summary.optimizations_created += 1;
                    self.store
                        .conflicts()
                        .apply(
                            &known.id,
                            doc! { "optimization_id": &optimization.id, "status": "under_review" },
                        )
                        .await?;

                    if self
                        .router
                        .send_seo_text(
                            &messages::conflict_detected(detected, &network.name, Some(count)),
                            Some(TopicFamily::SeoChange),
                        )
                        .await
                    {
                        summary.notifications_sent += 1;
                    }
                }
                Some(known) => {
                    self.store
                        .conflicts()
                        .apply(&known.id, doc! { "updated_at": bson_ts(&now)? })
                        .await?;
                }
                None => {
                    summary.new_conflicts += 1;
                    let conflict = Conflict {
                        id: Uuid::new_v4().to_string(),
                        network_id: network_id.to_string(),
                        conflict_type: detected.conflict_type,
                        severity: detected.severity,
                        status: ConflictStatus::Detected,
                        is_active: true,
                        fingerprint,
                        node_a_id: detected.node_a_id.clone(),
                        node_a_label: detected.node_a_label.clone(),
                        node_b_id: detected.node_b_id.clone(),
                        node_b_label: detected.node_b_label.clone(),
                        domain_name: detected.domain_name.clone(),
                        description: detected.description.clone(),
                        suggestion: detected.suggestion.clone(),
                        detected_at: now,
                        first_detected_at: now,
                        last_recurrence_at: None,
                        recurrence_count: 0,
                        optimization_id: None,
                        resolved_at: None,
                        resolved_by: None,
                        resolution_note: None,
                        updated_at: now,
                    };
                    self.store.conflicts().insert(&conflict).await?;

                    let optimization = self
                        .create_linked_optimization(&conflict.id, detected, &network.brand_id, None)
                        .await?;
                    summary.optimizations_created += 1;
                    self.store
                        .conflicts()
                        .apply(
                            &conflict.id,
                            doc! { "optimization_id": &optimization.id, "status": "under_review" },
                        )
                        .await?;

                    if self
                        .router
                        .send_seo_text(
                            &messages::conflict_detected(detected, &network.name, None),
                            Some(TopicFamily::SeoChange),
                        )
                        .await
                    {
                        summary.notifications_sent += 1;
                    }
                }
            }
        }

        info!(
            network = %network.name,
            new = summary.new_conflicts,
            recurring = summary.recurring_conflicts,
            "Conflict detection batch processed"
        );
        Ok(summary)
    }

    async fn create_linked_optimization(
        &self,
        conflict_id: &str,
        detected: &DetectedConflict,
        brand_id: &str,
        recurrence: Option<u32>,
    ) -> NocResult<Optimization> {
        let now = Utc::now();
        let type_label = detected.conflict_type.label();

        let marker = recurrence
            .map(|n| format!(" [RECURRING #{n}]"))
            .unwrap_or_default();
        let title = format!("[Conflict Resolution] {type_label}{marker}");

        let mut description_lines = vec![
            "**Auto-generated from a detected SEO conflict**".to_string(),
            String::new(),
            format!("**Conflict Type:** {type_label}"),
            format!("**Severity:** {}", detected.severity.as_upper()),
            format!("**Domain:** {}", detected.domain_name),
            String::new(),
            "**Description:**".to_string(),
            detected.description.clone(),
            String::new(),
            "**Affected Nodes:**".to_string(),
            format!("- {}", detected.node_a_label),
        ];
        if let Some(node_b) = &detected.node_b_label {
            description_lines.push(format!("- {node_b}"));
        }
        if let Some(suggestion) = &detected.suggestion {
            description_lines.extend([
                String::new(),
                "**Suggested Fix:**".to_string(),
                suggestion.clone(),
            ]);
        }

        let mut reason_note = format!(
            "Automatically created to resolve a {type_label} conflict. Severity: {}.",
            detected.severity.as_upper()
        );
        if let Some(n) = recurrence {
            reason_note.push_str(&format!(" This conflict has recurred {n} time(s)."));
        }

        let optimization = Optimization {
            id: Uuid::new_v4().to_string(),
            network_id: detected.network_id.clone(),
            brand_id: brand_id.to_string(),
            title,
            description: description_lines.join("\n"),
            reason_note,
            activity_type: "conflict_resolution".to_string(),
            affected_scope: AffectedScope::SpecificDomain,
            target_domains: if detected.domain_name.is_empty() {
                vec![]
            } else {
                vec![detected.domain_name.clone()]
            },
            keywords: vec![],
            report_urls: vec![],
            expected_impact: vec![ExpectedImpact::Authority],
            observed_impact: None,
            status: OptimizationStatus::Planned,
            complaint_status: Default::default(),
            linked_conflict_id: Some(conflict_id.to_string()),
            priority: Some(detected.severity),
            created_by: ActorRef::system(),
            created_at: now,
            updated_at: now,
            closed_at: None,
            closed_by: None,
            last_reminder_sent_at: None,
            responses: vec![],
        };
        self.store.optimizations().insert(&optimization).await?;
        info!(
            optimization_id = %optimization.id,
            conflict_id,
            "Created linked optimization"
        );
        Ok(optimization)
    }

    /// Two-way sync: the linked conflict follows its optimization's status.
    pub async fn on_optimization_status_changed(
        &self,
        optimization: &Optimization,
        new_status: OptimizationStatus,
        actor: &ActorRef,
    ) -> NocResult<()> {
        let Some(conflict_id) = optimization.linked_conflict_id.as_deref() else {
            return Ok(());
        };
        let Some(conflict) = self.store.conflicts().find_by_id(conflict_id).await? else {
            return Ok(());
        };
        let now = Utc::now();

        match new_status {
            OptimizationStatus::Completed => {
                self.resolve_conflict(&conflict, actor, None).await?;
            }
            OptimizationStatus::InProgress => {
                self.store
                    .conflicts()
                    .apply(
                        &conflict.id,
                        doc! { "status": "under_review", "updated_at": bson_ts(&now)? },
                    )
                    .await?;
            }
            OptimizationStatus::Reverted => {
                self.store
                    .conflicts()
                    .apply(
                        &conflict.id,
                        doc! {
                            "status": "detected",
                            "is_active": true,
                            "resolved_at": Bson::Null,
                            "updated_at": bson_ts(&now)?,
                        },
                    )
                    .await?;
            }
            OptimizationStatus::Planned => {}
        }
        Ok(())
    }

    /// Resolution is idempotent: resolving an already-resolved conflict is
    /// a no-op.
    pub async fn resolve_conflict(
        &self,
        conflict: &Conflict,
        actor: &ActorRef,
        resolution_note: Option<&str>,
    ) -> NocResult<()> {
        if conflict.status == ConflictStatus::Resolved {
            return Ok(());
        }
        let now = Utc::now();
        self.store
            .conflicts()
            .apply(
                &conflict.id,
                doc! {
                    "status": "resolved",
                    "is_active": false,
                    "resolved_at": bson_ts(&now)?,
                    "resolved_by": &actor.user_id,
                    "resolution_note": resolution_note.map(|n| Bson::String(n.to_string())).unwrap_or(Bson::Null),
                    "updated_at": bson_ts(&now)?,
                },
            )
            .await?;

        let resolver = if actor.display_name.is_empty() {
            actor.email.clone()
        } else {
            actor.display_name.clone()
        };
        self.router
            .send_seo_text(
                &messages::conflict_resolved(conflict, &resolver),
                Some(TopicFamily::SeoChange),
            )
            .await;
        Ok(())
    }

    /// Super-admin approval: the conflict is accepted as-is. Resets the
    /// recurrence counter and auto-completes the linked optimization.
    pub async fn approve_conflict(&self, conflict_id: &str, actor: &ActorRef) -> NocResult<()> {
        let conflict = self
            .store
            .conflicts()
            .find_by_id(conflict_id)
            .await?
            .ok_or_else(|| NocError::not_found(format!("conflict {conflict_id}")))?;
        let now = Utc::now();
        self.store
            .conflicts()
            .apply(
                &conflict.id,
                doc! {
                    "status": "approved",
                    "is_active": false,
                    "recurrence_count": 0i64,
                    "resolved_at": bson_ts(&now)?,
                    "resolved_by": &actor.user_id,
                    "updated_at": bson_ts(&now)?,
                },
            )
            .await?;

        if let Some(optimization_id) = conflict.optimization_id.as_deref() {
            self.store
                .optimizations()
                .apply(
                    optimization_id,
                    doc! {
                        "status": "completed",
                        "closed_at": bson_ts(&now)?,
                        "closed_by": &actor.user_id,
                        "updated_at": bson_ts(&now)?,
                    },
                )
                .await?;
        }

        record_audit(
            &self.store,
            "conflict_approved",
            &actor.email,
            &format!("seo_conflict:{conflict_id}"),
            &format!("approved {} conflict", conflict.conflict_type.as_str()),
            AuditSeverity::Info,
            true,
        )
        .await;
        Ok(())
    }

    /// Deleting an optimization un-links its conflict, which reverts to
    /// `detected` and is ready for a fresh optimization.
    pub async fn unlink_on_optimization_delete(&self, optimization_id: &str) -> NocResult<()> {
        let Some(conflict) = self
            .store
            .conflicts()
            .find_by_optimization(optimization_id)
            .await?
        else {
            return Ok(());
        };
        self.store
            .conflicts()
            .apply(
                &conflict.id,
                doc! {
                    "status": "detected",
                    "is_active": true,
                    "optimization_id": Bson::Null,
                    "updated_at": bson_ts(&Utc::now())?,
                },
            )
            .await?;
        Ok(())
    }

    /// Resolution metrics over the last `days` days.
    pub async fn conflict_metrics(
        &self,
        network_id: Option<&str>,
        days: i64,
    ) -> NocResult<serde_json::Value> {
        let since = Utc::now() - Duration::days(days);
        let conflicts = self
            .store
            .conflicts()
            .find_detected_since(network_id, since)
            .await?;

        let resolved: Vec<&Conflict> = conflicts
            .iter()
            .filter(|c| {
                matches!(
                    c.status,
                    ConflictStatus::Resolved | ConflictStatus::Approved
                )
            })
            .collect();
        // Active recurring only: settled or deactivated conflicts don't
        // count as currently recurring.
        let recurring = conflicts
            .iter()
            .filter(|c| c.recurrence_count > 0 && c.is_active && !c.status.is_settled())
            .count();

        let resolution_hours: Vec<f64> = resolved
            .iter()
            .filter_map(|c| {
                c.resolved_at
                    .map(|r: DateTime<Utc>| (r - c.detected_at).num_seconds() as f64 / 3600.0)
            })
            .collect();
        let avg_hours = if resolution_hours.is_empty() {
            0.0
        } else {
            resolution_hours.iter().sum::<f64>() / resolution_hours.len() as f64
        };

        let mut by_severity: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut by_type: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut by_resolver: HashMap<String, usize> = HashMap::new();
        for c in &conflicts {
            let is_resolved = matches!(
                c.status,
                ConflictStatus::Resolved | ConflictStatus::Approved
            );
            let sev = by_severity.entry(c.severity.as_str()).or_default();
            sev.0 += 1;
            if is_resolved {
                sev.1 += 1;
            }
            let ty = by_type.entry(c.conflict_type.as_str()).or_default();
            ty.0 += 1;
            if is_resolved {
                ty.1 += 1;
            }
            if is_resolved {
                let resolver = c.resolved_by.clone().unwrap_or_else(|| "unknown".to_string());
                *by_resolver.entry(resolver).or_default() += 1;
            }
        }

        let group = |m: HashMap<&str, (usize, usize)>| -> serde_json::Value {
            m.into_iter()
                .map(|(k, (total, resolved))| {
                    (k.to_string(), json!({ "total": total, "resolved": resolved }))
                })
                .collect::<serde_json::Map<_, _>>()
                .into()
        };

        Ok(json!({
            "period_days": days,
            "total_conflicts": conflicts.len(),
            "resolved_count": resolved.len(),
            "open_count": conflicts.len() - resolved.len(),
            "avg_resolution_time_hours": (avg_hours * 10.0).round() / 10.0,
            "recurring_conflicts": recurring,
            "by_severity": group(by_severity),
            "by_type": group(by_type),
            "by_resolver": by_resolver,
        }))
    }
}

/// Serialize a timestamp for a `$set` document; serialization of a chrono
/// value cannot realistically fail, but the error still routes through the
/// taxonomy instead of panicking.
fn bson_ts(value: &DateTime<Utc>) -> NocResult<Bson> {
    bson::to_bson(value).map_err(|e| NocError::Internal(e.into()))
}
