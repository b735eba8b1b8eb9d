use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seonoc_common::types::AuditSeverity;
use seonoc_store::audit::AuditQuery;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct AuditListQuery {
    pub event_type: Option<String>,
    pub actor_email: Option<String>,
    pub resource: Option<String>,
    pub severity: Option<AuditSeverity>,
    pub success: Option<bool>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

pub async fn query(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<AuditListQuery>,
) -> ApiResult<Json<Value>> {
    let entries = core
        .store
        .audit()
        .query(&AuditQuery {
            event_type: q.event_type,
            actor_email: q.actor_email,
            resource: q.resource,
            severity: q.severity,
            success: q.success,
            skip: q.skip.unwrap_or(0),
            limit: q.limit.unwrap_or(100),
        })
        .await?;
    Ok(Json(json!({ "total": entries.len(), "entries": entries })))
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

pub async fn stats(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<StatsQuery>,
) -> ApiResult<Json<Value>> {
    let stats = core
        .store
        .audit()
        .stats(q.days.unwrap_or(7).clamp(1, 365))
        .await?;
    Ok(Json(serde_json::to_value(stats).map_err(anyhow::Error::from)?))
}
