use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct ListQuery {
    pub network_id: String,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let logs = core
        .store
        .change_logs()
        .list_by_network(&q.network_id, q.skip.unwrap_or(0), q.limit.unwrap_or(50))
        .await?;
    Ok(Json(json!({ "total": logs.len(), "changes": logs })))
}

/// Manual re-send for a failed notification; there is no automatic retry
/// queue.
pub async fn retry_notification(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let sent = core.pipeline.retry_notification(&id).await?;
    Ok(Json(json!({ "sent": sent })))
}
