use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use bson::doc;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use seonoc_common::settings::{
    SystemTimezone, TelegramSeoSettings, KEY_SYSTEM_TIMEZONE, KEY_TELEGRAM_SEO,
};
use seonoc_common::types::{Complaint, ComplaintState, EventType, Optimization, Severity};
use seonoc_common::NocError;
use seonoc_ledger::validate_resolution_note;
use seonoc_templates::ContextBuilder;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct ComplaintBody {
    pub reason: String,
    pub priority: Severity,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub report_urls: Vec<String>,
    #[serde(default)]
    pub responsible_user_ids: Vec<String>,
}

pub async fn create_for_optimization(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(optimization_id): Path<String>,
    Json(body): Json<ComplaintBody>,
) -> ApiResult<Json<Value>> {
    if body.reason.trim().is_empty() {
        return Err(NocError::validation("complaint reason is required").into());
    }
    let optimization = core
        .store
        .optimizations()
        .find_by_id(&optimization_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("optimization {optimization_id}")))?;

    let complaint = build_complaint(&actor, &optimization.network_id, Some(&optimization.id), body);
    core.store.complaints().insert(&complaint).await?;
    core.store
        .optimizations()
        .apply(
            &optimization.id,
            doc! {
                "complaint_status": "complained",
                "updated_at": bson::to_bson(&Utc::now()).map_err(anyhow::Error::from)?,
            },
        )
        .await?;

    notify_complaint(&core, &actor, &complaint, Some(&optimization)).await?;
    Ok(Json(serde_json::to_value(complaint).map_err(anyhow::Error::from)?))
}

/// Project-level complaint: tied to a network, not to any optimization.
pub async fn create_for_network(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(network_id): Path<String>,
    Json(body): Json<ComplaintBody>,
) -> ApiResult<Json<Value>> {
    if body.reason.trim().is_empty() {
        return Err(NocError::validation("complaint reason is required").into());
    }
    core.store
        .networks()
        .find_by_id(&network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {network_id}")))?;

    let complaint = build_complaint(&actor, &network_id, None, body);
    core.store.complaints().insert(&complaint).await?;
    notify_complaint(&core, &actor, &complaint, None).await?;
    Ok(Json(serde_json::to_value(complaint).map_err(anyhow::Error::from)?))
}

#[derive(Deserialize)]
pub struct ResolveBody {
    pub resolution_note: String,
}

pub async fn resolve(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<ResolveBody>,
) -> ApiResult<Json<Value>> {
    validate_resolution_note(&body.resolution_note)?;
    let complaint = core
        .store
        .complaints()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("complaint {id}")))?;
    if complaint.status == ComplaintState::Resolved {
        return Ok(Json(json!({ "status": "resolved", "changed": false })));
    }

    let now = Utc::now();
    let hours = (now - complaint.created_at).num_seconds() as f64 / 3600.0;
    core.store
        .complaints()
        .apply(
            &id,
            doc! {
                "status": "resolved",
                "resolved_at": bson::to_bson(&now).map_err(anyhow::Error::from)?,
                "resolution_note": body.resolution_note.trim(),
                "time_to_resolution_hours": (hours * 10.0).round() / 10.0,
            },
        )
        .await?;
    if let Some(optimization_id) = &complaint.optimization_id {
        core.store
            .optimizations()
            .apply(optimization_id, doc! { "complaint_status": "resolved" })
            .await?;
    }
    seonoc_ledger::record_audit(
        &core.store,
        "complaint_resolved",
        &actor.actor.email,
        &format!("seo_complaint:{id}"),
        &format!("resolved in {:.1}h", hours),
        seonoc_common::types::AuditSeverity::Info,
        true,
    )
    .await;
    Ok(Json(json!({ "status": "resolved", "changed": true })))
}

fn build_complaint(
    actor: &Actor,
    network_id: &str,
    optimization_id: Option<&str>,
    body: ComplaintBody,
) -> Complaint {
    Complaint {
        id: Uuid::new_v4().to_string(),
        network_id: network_id.to_string(),
        optimization_id: optimization_id.map(str::to_string),
        reason: body.reason.trim().to_string(),
        priority: body.priority,
        category: body.category,
        report_urls: body.report_urls,
        responsible_user_ids: body.responsible_user_ids,
        status: ComplaintState::Open,
        created_by: actor.actor.clone(),
        created_at: Utc::now(),
        resolved_at: None,
        resolution_note: None,
        time_to_resolution_hours: None,
    }
}

async fn notify_complaint(
    core: &Arc<NocCore>,
    actor: &Actor,
    complaint: &Complaint,
    optimization: Option<&Optimization>,
) -> Result<(), NocError> {
    let network = core.store.networks().find_by_id(&complaint.network_id).await?;
    let (network_name, brand_id, managers) = network
        .map(|n| (n.name, n.brand_id, n.manager_ids))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new(), vec![]));
    let brand_name = core.store.brands().name_of(&brand_id).await?;

    let tz: SystemTimezone = core.store.settings().get(KEY_SYSTEM_TIMEZONE).await?;
    let chat: TelegramSeoSettings = core.store.settings().get(KEY_TELEGRAM_SEO).await?;
    let mut builder = ContextBuilder::new(&tz)
        .actor(&actor.actor, &actor.role)
        .network(&network_name, &complaint.network_id)
        .brand(&brand_name, &brand_id)
        .complaint(complaint)
        .tagging(&chat.leader_usernames, &managers, &managers);
    let event = match optimization {
        Some(optimization) => {
            builder = builder.optimization(optimization);
            EventType::SeoComplaint
        }
        None => EventType::SeoProjectComplaint,
    };
    core.router.send_event(event, &builder.build()).await;
    Ok(())
}
