use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use bson::doc;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use seonoc_common::settings::{
    SystemTimezone, TelegramSeoSettings, KEY_SYSTEM_TIMEZONE, KEY_TELEGRAM_SEO,
};
use seonoc_common::types::{
    AffectedScope, AuditSeverity, EventType, ExpectedImpact, Optimization, OptimizationStatus,
    ReportUrl, Severity, TeamResponse,
};
use seonoc_common::NocError;
use seonoc_ledger::{record_audit, validate_reason_note};
use seonoc_templates::ContextBuilder;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct CreateBody {
    pub network_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reason_note: String,
    pub activity_type: String,
    pub affected_scope: AffectedScope,
    #[serde(default)]
    pub target_domains: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub report_urls: Vec<ReportUrl>,
    #[serde(default)]
    pub expected_impact: Vec<ExpectedImpact>,
    #[serde(default)]
    pub priority: Option<Severity>,
}

pub async fn create(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Json(body): Json<CreateBody>,
) -> ApiResult<Json<Value>> {
    validate_reason_note(&body.reason_note)?;
    if body.title.trim().is_empty() {
        return Err(NocError::validation("title is required").into());
    }
    let network = core
        .store
        .networks()
        .find_by_id(&body.network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {}", body.network_id)))?;
    actor.ensure_network_access(&network)?;

    let now = Utc::now();
    let optimization = Optimization {
        id: Uuid::new_v4().to_string(),
        network_id: network.id.clone(),
        brand_id: network.brand_id.clone(),
        title: body.title.trim().to_string(),
        description: body.description,
        reason_note: body.reason_note,
        activity_type: body.activity_type,
        affected_scope: body.affected_scope,
        target_domains: body.target_domains,
        keywords: body.keywords,
        report_urls: body.report_urls,
        expected_impact: body.expected_impact,
        observed_impact: None,
        status: OptimizationStatus::Planned,
        complaint_status: Default::default(),
        linked_conflict_id: None,
        priority: body.priority,
        created_by: actor.actor.clone(),
        created_at: now,
        updated_at: now,
        closed_at: None,
        closed_by: None,
        last_reminder_sent_at: None,
        responses: vec![],
    };
    core.store.optimizations().insert(&optimization).await?;

    let brand_name = core.store.brands().name_of(&network.brand_id).await?;
    let context = optimization_context(&core, &actor, &network.name, &brand_name, &optimization)
        .await?
        .build();
    core.router
        .send_event(EventType::SeoOptimization, &context)
        .await;

    Ok(Json(serde_json::to_value(optimization).map_err(anyhow::Error::from)?))
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: OptimizationStatus,
    #[serde(default)]
    pub observed_impact: Option<String>,
}

pub async fn update_status(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> ApiResult<Json<Value>> {
    let optimization = core
        .store
        .optimizations()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("optimization {id}")))?;
    let network = core
        .store
        .networks()
        .find_by_id(&optimization.network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {}", optimization.network_id)))?;
    actor.ensure_network_access(&network)?;

    // Re-resolving an already-completed optimization is a no-op.
    if optimization.status == body.status {
        return Ok(Json(json!({ "status": optimization.status, "changed": false })));
    }

    let now = Utc::now();
    let mut set = doc! {
        "status": bson::to_bson(&body.status).map_err(anyhow::Error::from)?,
        "updated_at": bson::to_bson(&now).map_err(anyhow::Error::from)?,
    };
    if let Some(observed) = &body.observed_impact {
        set.insert("observed_impact", observed);
    }
    if matches!(
        body.status,
        OptimizationStatus::Completed | OptimizationStatus::Reverted
    ) {
        set.insert("closed_at", bson::to_bson(&now).map_err(anyhow::Error::from)?);
        set.insert("closed_by", &actor.actor.user_id);
    }
    core.store.optimizations().apply(&id, set).await?;

    core.linker
        .on_optimization_status_changed(&optimization, body.status, &actor.actor)
        .await?;

    let brand_name = core.store.brands().name_of(&network.brand_id).await?;
    let severity = match body.status {
        OptimizationStatus::Completed => Severity::Low,
        OptimizationStatus::Reverted => Severity::High,
        _ => Severity::Medium,
    };
    let context = optimization_context(&core, &actor, &network.name, &brand_name, &optimization)
        .await?
        .change(
            "status_change",
            "Status Change",
            "",
            optimization.status.label(),
            body.status.label(),
            "",
        )
        .impact(severity, "", 0)
        .build();
    core.router
        .send_event(EventType::SeoOptimizationStatus, &context)
        .await;

    Ok(Json(json!({ "status": body.status, "changed": true })))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub network_id: String,
    pub status: Option<OptimizationStatus>,
}

pub async fn list(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let optimizations = core
        .store
        .optimizations()
        .list_by_network(&q.network_id, q.status)
        .await?;
    Ok(Json(json!({ "total": optimizations.len(), "optimizations": optimizations })))
}

#[derive(Deserialize)]
pub struct RespondBody {
    pub message: String,
}

pub async fn respond(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<RespondBody>,
) -> ApiResult<Json<Value>> {
    if body.message.trim().is_empty() {
        return Err(NocError::validation("message is required").into());
    }
    core.store
        .optimizations()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("optimization {id}")))?;
    core.store
        .optimizations()
        .push_response(
            &id,
            &TeamResponse {
                author: actor.actor.clone(),
                message: body.message.trim().to_string(),
                created_at: Utc::now(),
            },
        )
        .await?;
    Ok(Json(json!({ "status": "recorded" })))
}

/// Super-admin deletion. The linked conflict reverts to `detected` and is
/// ready for a fresh optimization.
pub async fn delete(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !actor.is_super_admin() {
        return Err(NocError::Authorization(
            "only super admins may delete optimizations".to_string(),
        )
        .into());
    }
    let optimization = core
        .store
        .optimizations()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("optimization {id}")))?;

    core.linker.unlink_on_optimization_delete(&id).await?;
    core.store.optimizations().delete(&id).await?;
    record_audit(
        &core.store,
        "optimization_deleted",
        &actor.actor.email,
        &format!("seo_optimization:{id}"),
        &format!("deleted optimization '{}'", optimization.title),
        AuditSeverity::Warning,
        true,
    )
    .await;
    Ok(Json(json!({ "status": "deleted" })))
}

async fn optimization_context(
    core: &Arc<NocCore>,
    actor: &Actor,
    network_name: &str,
    brand_name: &str,
    optimization: &Optimization,
) -> Result<ContextBuilder, NocError> {
    let tz: SystemTimezone = core.store.settings().get(KEY_SYSTEM_TIMEZONE).await?;
    let chat: TelegramSeoSettings = core.store.settings().get(KEY_TELEGRAM_SEO).await?;
    Ok(ContextBuilder::new(&tz)
        .actor(&actor.actor, &actor.role)
        .network(network_name, &optimization.network_id)
        .brand(brand_name, &optimization.brand_id)
        .optimization(optimization)
        .tagging(&chat.leader_usernames, &[], &[]))
}
