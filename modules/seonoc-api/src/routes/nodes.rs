use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seonoc_common::types::{DomainRole, IndexStatus, NodeStatus};
use seonoc_common::NocError;
use seonoc_ledger::NodeInput;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

#[derive(Deserialize)]
pub struct NodeBody {
    pub asset_domain_id: String,
    #[serde(default)]
    pub optimized_path: Option<String>,
    pub domain_role: DomainRole,
    pub domain_status: NodeStatus,
    pub index_status: IndexStatus,
    #[serde(default)]
    pub target_entry_id: Option<String>,
    #[serde(default)]
    pub ranking_position: Option<u8>,
    #[serde(default)]
    pub primary_keyword: String,
    #[serde(default)]
    pub ranking_url: String,
    #[serde(default)]
    pub notes: String,
    pub change_note: String,
}

impl NodeBody {
    fn into_input(self) -> NodeInput {
        NodeInput {
            asset_domain_id: self.asset_domain_id,
            optimized_path: self.optimized_path,
            domain_role: self.domain_role,
            domain_status: self.domain_status,
            index_status: self.index_status,
            target_entry_id: self.target_entry_id,
            ranking_position: self.ranking_position,
            primary_keyword: self.primary_keyword,
            ranking_url: self.ranking_url,
            notes: self.notes,
            change_note: self.change_note,
        }
    }
}

pub async fn create_node(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(network_id): Path<String>,
    Json(body): Json<NodeBody>,
) -> ApiResult<Json<Value>> {
    let network = core
        .store
        .networks()
        .find_by_id(&network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {network_id}")))?;
    actor.ensure_network_access(&network)?;

    let entry = core
        .pipeline
        .create_node(&actor.actor, &network_id, body.into_input())
        .await?;
    Ok(Json(serde_json::to_value(entry).map_err(anyhow::Error::from)?))
}

pub async fn update_node(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(entry_id): Path<String>,
    Json(body): Json<NodeBody>,
) -> ApiResult<Json<Value>> {
    let entry = core
        .store
        .entries()
        .find_by_id(&entry_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("structure entry {entry_id}")))?;
    let network = core
        .store
        .networks()
        .find_by_id(&entry.network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {}", entry.network_id)))?;
    actor.ensure_network_access(&network)?;

    let updated = core
        .pipeline
        .update_node(&actor.actor, &entry_id, body.into_input())
        .await?;
    Ok(Json(serde_json::to_value(updated).map_err(anyhow::Error::from)?))
}

#[derive(Deserialize)]
pub struct DeleteNodeBody {
    pub change_note: String,
}

pub async fn delete_node(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(entry_id): Path<String>,
    Json(body): Json<DeleteNodeBody>,
) -> ApiResult<Json<Value>> {
    let entry = core
        .store
        .entries()
        .find_by_id(&entry_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("structure entry {entry_id}")))?;
    let network = core
        .store
        .networks()
        .find_by_id(&entry.network_id)
        .await?
        .ok_or_else(|| NocError::not_found(format!("network {}", entry.network_id)))?;
    actor.ensure_network_access(&network)?;

    core.pipeline
        .delete_node(&actor.actor, &entry_id, &body.change_note)
        .await?;
    Ok(Json(json!({ "status": "deleted" })))
}
