//! Operator test alerts: simulate a down / soft-blocked alert for any
//! domain without touching real monitoring state. The message goes through
//! the live channel (clearly marked TEST) and the record lands in a
//! history collection.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use seonoc_common::error::{NocError, NocResult};
use seonoc_common::types::{Severity, TestAlertRecord, TestIssueType};
use seonoc_graph::enrich::network_snapshot_for;
use seonoc_graph::{enrich_domain, SeoContext};
use seonoc_notify::NotificationRouter;
use seonoc_store::StoreClient;

use crate::context::seo_maps;

const BAR: &str = "━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone)]
pub struct TestAlertInput {
    pub domain: String,
    pub issue_type: TestIssueType,
    pub reason: String,
    pub force_severity: Option<Severity>,
    pub actor_email: String,
}

/// Message body for a simulated alert. Same section order as the real
/// alerts, with an unmistakable TEST MODE banner.
pub fn test_alert_message(
    domain_name: &str,
    issue_type: TestIssueType,
    reason: &str,
    severity: Severity,
    ctx: &SeoContext,
    structure: &str,
) -> String {
    let issue_label = match issue_type {
        TestIssueType::Down => "DOWN",
        TestIssueType::SoftBlocked => "SOFT_BLOCKED",
    };
    let mut lines = vec![
        format!("🧪 <b>TEST MODE – {issue_label}</b>"),
        "<i>Simulated alert. No monitoring state was changed.</i>".to_string(),
        String::new(),
        BAR.to_string(),
        "📌 <b>DOMAIN INFO</b>".to_string(),
        BAR.to_string(),
        format!("• Domain: {domain_name}"),
        format!("• Issue: {issue_label}"),
        format!("• Reason: {reason}"),
        String::new(),
        BAR.to_string(),
        "🧭 <b>SEO CONTEXT</b>".to_string(),
        BAR.to_string(),
    ];
    if ctx.used_in_seo {
        lines.push(format!("• Networks: {}", ctx.impact.networks_affected));
        lines.push(format!("• Upstream Chain: {}", ctx.upstream_chain_text()));
        if !structure.is_empty() {
            lines.extend([
                String::new(),
                BAR.to_string(),
                "🧭 <b>CURRENT SEO STRUCTURE</b>".to_string(),
                BAR.to_string(),
                structure.to_string(),
            ]);
        }
    } else {
        lines.push(format!("• {domain_name} is not used in any SEO network"));
    }
    lines.extend([
        String::new(),
        BAR.to_string(),
        "🔥 <b>IMPACT SUMMARY</b>".to_string(),
        BAR.to_string(),
        format!("• Severity: {} {}", severity.emoji(), severity.as_upper()),
        format!("• Affected Nodes: {}", ctx.impact.downstream_nodes_count),
        String::new(),
        BAR.to_string(),
        "⏰ <b>NEXT ACTION</b>".to_string(),
        BAR.to_string(),
        "None. This was a test.".to_string(),
    ]);
    lines.join("\n")
}

/// Run a simulated alert: enrich, render, send, record history. Returns
/// the history record plus the SEO context used to build it.
pub async fn run_test_alert(
    store: &StoreClient,
    router: &Arc<NotificationRouter>,
    input: TestAlertInput,
) -> NocResult<(TestAlertRecord, SeoContext)> {
    if input.domain.trim().is_empty() {
        return Err(NocError::validation("domain is required"));
    }

    let (entries, names) = seo_maps(store).await.map_err(NocError::Internal)?;
    let domain_id = store
        .domains()
        .find_by_name(input.domain.trim())
        .await?
        .map(|d| d.id);
    let ctx = match &domain_id {
        Some(id) => enrich_domain(id, &entries, &names),
        None => enrich_domain("", &entries, &names),
    };
    let severity = input.force_severity.unwrap_or(match input.issue_type {
        TestIssueType::Down => ctx.severity.max(Severity::High),
        TestIssueType::SoftBlocked => ctx.severity,
    });

    let structure = ctx
        .references
        .first()
        .map(|r| network_snapshot_for(&r.network_id, &entries, &names))
        .unwrap_or_default();
    let message = test_alert_message(
        input.domain.trim(),
        input.issue_type,
        &input.reason,
        severity,
        &ctx,
        &structure,
    );

    router.send_monitoring_text(&message).await;

    let record = TestAlertRecord {
        id: Uuid::new_v4().to_string(),
        domain: input.domain.trim().to_string(),
        issue_type: input.issue_type,
        reason: input.reason,
        severity,
        test_mode: true,
        message_preview: message,
        actor_email: input.actor_email,
        created_at: Utc::now(),
    };
    store.test_alerts().insert(&record).await?;
    Ok((record, ctx))
}
