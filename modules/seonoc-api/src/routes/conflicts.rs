use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seonoc_common::types::{ConflictStatus, Severity};
use seonoc_common::NocError;
use seonoc_graph::tiers::compute_tiers;
use seonoc_graph::detect_conflicts;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

/// Run the detectors over a network and feed the batch through the linker.
pub async fn detect(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(network_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let network = core
        .store
        .networks()
        .find_by_id(&network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {network_id}")))?;
    actor.ensure_network_access(&network)?;

    let entries = core.store.entries().find_by_network(&network_id).await?;
    let ids: Vec<String> = entries.iter().map(|e| e.asset_domain_id.clone()).collect();
    let names = core
        .store
        .domains()
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|d| (d.id, d.domain_name))
        .collect();
    let tiers = compute_tiers(&entries);
    let detected = detect_conflicts(&entries, &names, &tiers);

    let summary = core.linker.process_detections(&network_id, &detected).await?;
    let conflicts = core
        .store
        .conflicts()
        .list(Some(&network_id), None, None, 200)
        .await?;
    Ok(Json(json!({ "summary": summary, "conflicts": conflicts })))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub network_id: Option<String>,
    pub status: Option<ConflictStatus>,
    pub severity: Option<Severity>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let conflicts = core
        .store
        .conflicts()
        .list(
            q.network_id.as_deref(),
            q.status,
            q.severity,
            q.limit.unwrap_or(100),
        )
        .await?;
    Ok(Json(json!({ "total": conflicts.len(), "conflicts": conflicts })))
}

#[derive(Deserialize)]
pub struct MetricsQuery {
    pub network_id: Option<String>,
    pub days: Option<i64>,
}

pub async fn metrics(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<MetricsQuery>,
) -> ApiResult<Json<Value>> {
    let metrics = core
        .linker
        .conflict_metrics(q.network_id.as_deref(), q.days.unwrap_or(30).clamp(1, 365))
        .await?;
    Ok(Json(metrics))
}

/// Super-admin acceptance of a conflict as-is.
pub async fn approve(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !actor.is_super_admin() {
        return Err(NocError::Authorization(
            "only super admins may approve conflicts".to_string(),
        )
        .into());
    }
    core.linker.approve_conflict(&id, &actor.actor).await?;
    Ok(Json(json!({ "status": "approved" })))
}
