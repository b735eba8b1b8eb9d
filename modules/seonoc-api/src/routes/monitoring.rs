use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seonoc_common::types::{Severity, TestIssueType};
use seonoc_common::NocError;
use seonoc_monitor::reminders::UnmonitoredReminderWorker;
use seonoc_monitor::test_alert::{run_test_alert, TestAlertInput};
use seonoc_monitor::{coverage_summary, list_unmonitored};

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

pub async fn unmonitored_in_seo(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
) -> ApiResult<Json<Value>> {
    let unmonitored = list_unmonitored(&core.store).await?;
    Ok(Json(json!({
        "total": unmonitored.len(),
        "unmonitored_domains": unmonitored,
    })))
}

pub async fn seo_domains_summary(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
) -> ApiResult<Json<Value>> {
    Ok(Json(coverage_summary(&core.store).await?))
}

/// Manual trigger for the daily unmonitored-domain reminders. The 24 h
/// per-domain throttle still applies, so hammering this is harmless.
pub async fn send_unmonitored_reminders(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
) -> ApiResult<Json<Value>> {
    let worker = UnmonitoredReminderWorker::new(
        core.store.clone(),
        core.router.clone(),
        core.throttle.clone(),
        core.running.clone(),
    );
    let sent = worker.send_reminders().await?;
    Ok(Json(json!({
        "status": "completed",
        "message": format!("{sent} reminder(s) sent"),
    })))
}

#[derive(Deserialize)]
pub struct TestAlertBody {
    pub domain: String,
    pub issue_type: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub force_severity: Option<String>,
}

pub async fn test_alert(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Json(body): Json<TestAlertBody>,
) -> ApiResult<Json<Value>> {
    let issue_type = match body.issue_type.as_str() {
        "DOWN" => TestIssueType::Down,
        "SOFT_BLOCKED" => TestIssueType::SoftBlocked,
        other => {
            return Err(NocError::validation(format!("invalid issue_type: {other}")).into());
        }
    };
    let force_severity = match body.force_severity.as_deref() {
        None => None,
        Some("LOW") => Some(Severity::Low),
        Some("MEDIUM") => Some(Severity::Medium),
        Some("HIGH") => Some(Severity::High),
        Some("CRITICAL") => Some(Severity::Critical),
        Some(other) => {
            return Err(NocError::validation(format!("invalid severity: {other}")).into());
        }
    };

    let (record, ctx) = run_test_alert(
        &core.store,
        &core.router,
        TestAlertInput {
            domain: body.domain,
            issue_type,
            reason: body.reason.unwrap_or_else(|| "Test".to_string()),
            force_severity,
            actor_email: actor.actor.email.clone(),
        },
    )
    .await?;

    Ok(Json(json!({
        "test_mode": true,
        "domain": record.domain,
        "issue_type": record.issue_type,
        "severity": record.severity.as_upper(),
        "seo_context": {
            "used_in_seo": ctx.used_in_seo,
            "impact_score": {
                "severity": ctx.severity.as_upper(),
                "reaches_money_site": ctx.impact.reaches_money_site,
                "downstream_nodes_count": ctx.impact.downstream_nodes_count,
                "networks_affected": ctx.impact.networks_affected,
                "highest_tier_impacted": ctx.impact.highest_tier_impacted,
                "node_role": if ctx.impact.node_role_main { "main" } else { "supporting" },
            },
        },
        "message_preview": record.message_preview,
    })))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub domain: Option<String>,
}

pub async fn test_alert_history(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let history = core
        .store
        .test_alerts()
        .history(q.limit.unwrap_or(50), q.domain.as_deref())
        .await?;
    Ok(Json(json!({ "history": history })))
}
