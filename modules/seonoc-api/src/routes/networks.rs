use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seonoc_common::types::{AuditSeverity, VisibilityMode};
use seonoc_common::NocError;
use seonoc_graph::tiers::compute_tiers;
use seonoc_graph::structure_snapshot;
use seonoc_ledger::{record_audit, NewNetworkInput};

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct CreateNetworkBody {
    pub brand_id: String,
    pub name: String,
    #[serde(default)]
    pub visibility_mode: VisibilityMode,
    #[serde(default)]
    pub manager_ids: Vec<String>,
    pub change_note: String,
}

pub async fn create_network(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Json(body): Json<CreateNetworkBody>,
) -> ApiResult<Json<Value>> {
    let network = core
        .pipeline
        .create_network(
            &actor.actor,
            NewNetworkInput {
                brand_id: body.brand_id,
                name: body.name,
                visibility_mode: body.visibility_mode,
                manager_ids: body.manager_ids,
                change_note: body.change_note,
            },
        )
        .await?;
    Ok(Json(serde_json::to_value(network).map_err(anyhow::Error::from)?))
}

pub async fn get_network(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let network = core
        .store
        .networks()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {id}")))?;
    actor.ensure_network_access(&network)?;

    let entries = core.store.entries().find_by_network(&id).await?;
    let tiers = compute_tiers(&entries);
    let nodes: Vec<Value> = entries
        .iter()
        .map(|e| {
            json!({
                "entry": e,
                "tier": tiers.tier(&e.id),
                "tier_display": tiers.display(&e.id),
                "orphan": tiers.is_orphan(&e.id),
            })
        })
        .collect();
    Ok(Json(json!({ "network": network, "nodes": nodes })))
}

pub async fn get_structure(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let network = core
        .store
        .networks()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {id}")))?;
    actor.ensure_network_access(&network)?;

    let entries = core.store.entries().find_by_network(&id).await?;
    let ids: Vec<String> = entries.iter().map(|e| e.asset_domain_id.clone()).collect();
    let domains = core.store.domains().find_by_ids(&ids).await?;
    let names = domains
        .into_iter()
        .map(|d| (d.id, d.domain_name))
        .collect();
    let tiers = compute_tiers(&entries);
    Ok(Json(json!({
        "network_id": id,
        "structure": structure_snapshot(&entries, &names, &tiers),
        "orphans": tiers.orphans(),
    })))
}

#[derive(Deserialize)]
pub struct MainSwitchBody {
    pub new_main_entry_id: String,
    pub change_note: String,
}

pub async fn switch_main(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
    Json(body): Json<MainSwitchBody>,
) -> ApiResult<Json<Value>> {
    let network = core
        .store
        .networks()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {id}")))?;
    actor.ensure_network_access(&network)?;

    core.pipeline
        .switch_main(&actor.actor, &id, &body.new_main_entry_id, &body.change_note)
        .await?;
    Ok(Json(json!({ "status": "switched" })))
}

/// Deleting a network takes its structure entries with it. Ledger rows and
/// conflicts survive as history.
pub async fn delete_network(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !actor.is_super_admin() {
        return Err(NocError::Authorization(
            "only super admins may delete networks".to_string(),
        )
        .into());
    }
    let network = core
        .store
        .networks()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {id}")))?;

    let removed = core.store.entries().delete_by_network(&id).await?;
    core.store.networks().delete(&id).await?;
    record_audit(
        &core.store,
        "network_deleted",
        &actor.actor.email,
        &format!("seo_network:{id}"),
        &format!("deleted network '{}' with {removed} nodes", network.name),
        AuditSeverity::Warning,
        true,
    )
    .await;
    Ok(Json(json!({ "status": "deleted", "nodes_removed": removed })))
}
