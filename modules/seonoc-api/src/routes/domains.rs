use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use seonoc_common::types::{
    AssetDomain, AuditSeverity, DomainStatus, LifecycleStatus, MonitoringInterval, PingStatus,
};
use seonoc_common::NocError;
use seonoc_ledger::record_audit;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct CreateDomainBody {
    pub domain_name: String,
    pub brand_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub registrar_id: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub monitoring_enabled: bool,
    #[serde(default)]
    pub monitoring_interval: Option<MonitoringInterval>,
}

pub async fn create(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Json(body): Json<CreateDomainBody>,
) -> ApiResult<Json<Value>> {
    let name = body.domain_name.trim().to_lowercase();
    if name.is_empty() || !name.contains('.') {
        return Err(NocError::validation("a valid domain name is required").into());
    }
    if core.store.domains().find_by_name(&name).await?.is_some() {
        return Err(NocError::Conflict(format!("domain {name} already exists")).into());
    }
    core.store
        .brands()
        .find_by_id(&body.brand_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("brand {}", body.brand_id)))?;

    let now = Utc::now();
    let domain = AssetDomain {
        id: Uuid::new_v4().to_string(),
        domain_name: name,
        brand_id: body.brand_id,
        category_id: body.category_id,
        registrar_id: body.registrar_id,
        status: DomainStatus::Active,
        expiration_date: body.expiration_date,
        auto_renew: body.auto_renew,
        monitoring_enabled: body.monitoring_enabled,
        monitoring_interval: body.monitoring_interval.unwrap_or(MonitoringInterval::Hourly),
        ping_status: PingStatus::Unknown,
        last_http_code: None,
        last_checked_at: None,
        soft_block_type: None,
        domain_lifecycle_status: LifecycleStatus::Active,
        quarantine_category: None,
        quarantined_by: None,
        quarantined_at: None,
        released_by: None,
        released_at: None,
        created_at: now,
        updated_at: now,
    };
    core.store.domains().insert(&domain).await?;
    record_audit(
        &core.store,
        "domain_created",
        &actor.actor.email,
        &format!("asset_domain:{}", domain.id),
        &format!("registered {}", domain.domain_name),
        AuditSeverity::Info,
        true,
    )
    .await;
    Ok(Json(serde_json::to_value(domain).map_err(anyhow::Error::from)?))
}

pub async fn list(State(core): State<Arc<NocCore>>, _actor: Actor) -> ApiResult<Json<Value>> {
    // Monitoring dashboard listing; filtering happens client-side.
    let monitored = core.store.domains().find_monitored().await?;
    let total = core.store.domains().count().await?;
    Ok(Json(json!({ "total": total, "monitored": monitored })))
}

#[derive(Deserialize)]
pub struct MonitoringBody {
    pub enabled: bool,
}

pub async fn set_monitoring(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<MonitoringBody>,
) -> ApiResult<Json<Value>> {
    core.store
        .domains()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("domain {id}")))?;
    core.store.domains().set_monitoring(&id, body.enabled).await?;
    record_audit(
        &core.store,
        "settings_change",
        &actor.actor.email,
        &format!("asset_domain:{id}"),
        &format!("monitoring_enabled = {}", body.enabled),
        AuditSeverity::Info,
        true,
    )
    .await;
    Ok(Json(json!({ "monitoring_enabled": body.enabled })))
}

/// Domains referenced by any structure entry cannot be deleted.
pub async fn remove(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let domain = core
        .store
        .domains()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("domain {id}")))?;
    if core.store.entries().domain_in_use(&id).await? {
        return Err(NocError::Conflict(format!(
            "domain {} is referenced by SEO structure entries",
            domain.domain_name
        ))
        .into());
    }
    core.store.domains().delete(&id).await?;
    record_audit(
        &core.store,
        "domain_deleted",
        &actor.actor.email,
        &format!("asset_domain:{id}"),
        &format!("deleted {}", domain.domain_name),
        AuditSeverity::Warning,
        true,
    )
    .await;
    Ok(Json(json!({ "status": "deleted" })))
}
