use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use seonoc_common::settings::{SystemTimezone, KEY_SYSTEM_TIMEZONE};
use seonoc_common::types::{AuditSeverity, Channel, EventType};
use seonoc_common::NocError;
use seonoc_ledger::record_audit;
use seonoc_templates::engine::{render, sample_context, validate};
use seonoc_templates::ContextBuilder;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

fn parse_pair(channel: &str, event: &str) -> Result<(Channel, EventType), NocError> {
    let channel = match channel {
        "telegram" => Channel::Telegram,
        "email" => Channel::Email,
        other => return Err(NocError::validation(format!("unknown channel: {other}"))),
    };
    let event = event
        .parse::<EventType>()
        .map_err(NocError::Validation)?;
    Ok((channel, event))
}

pub async fn list(State(core): State<Arc<NocCore>>, _actor: Actor) -> ApiResult<Json<Value>> {
    let templates = core.store.templates().list().await?;
    Ok(Json(json!({ "templates": templates })))
}

#[derive(Deserialize)]
pub struct UpdateBody {
    pub template_body: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Template save is gated on the allow-list: any unknown variable rejects
/// the whole update.
pub async fn update(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path((channel, event)): Path<(String, String)>,
    Json(body): Json<UpdateBody>,
) -> ApiResult<Json<Value>> {
    let (channel, event) = parse_pair(&channel, &event)?;
    let invalid = validate(&body.template_body);
    if !invalid.is_empty() {
        return Err(NocError::validation(format!(
            "unknown template variables: {}",
            invalid.join(", ")
        ))
        .into());
    }
    core.store
        .templates()
        .find(channel, event)
        .await?
        .ok_or_else(|| {
            NocError::not_found(format!("template {}/{}", channel.as_str(), event.as_str()))
        })?;

    core.store
        .templates()
        .update_body(channel, event, &body.template_body, body.enabled, &actor.actor.email)
        .await?;
    core.templates.invalidate(channel, event);
    record_audit(
        &core.store,
        "template_change",
        &actor.actor.email,
        &format!("template:{}/{}", channel.as_str(), event.as_str()),
        &format!("updated (enabled = {})", body.enabled),
        AuditSeverity::Info,
        true,
    )
    .await;
    Ok(Json(json!({ "status": "updated" })))
}

pub async fn reset(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path((channel, event)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let (channel, event) = parse_pair(&channel, &event)?;
    let template = core
        .store
        .templates()
        .reset(channel, event, &actor.actor.email)
        .await?
        .ok_or_else(|| {
            NocError::not_found(format!("template {}/{}", channel.as_str(), event.as_str()))
        })?;
    core.templates.invalidate(channel, event);
    record_audit(
        &core.store,
        "template_reset",
        &actor.actor.email,
        &format!("template:{}/{}", channel.as_str(), event.as_str()),
        "reset to default",
        AuditSeverity::Info,
        true,
    )
    .await;
    Ok(Json(serde_json::to_value(template).map_err(anyhow::Error::from)?))
}

#[derive(Deserialize)]
pub struct PreviewBody {
    pub template_body: String,
}

/// Render against the fixed sample context so operators can check output
/// before saving.
pub async fn preview(
    State(_core): State<Arc<NocCore>>,
    _actor: Actor,
    Json(body): Json<PreviewBody>,
) -> ApiResult<Json<Value>> {
    let invalid = validate(&body.template_body);
    let rendered = render(&body.template_body, &sample_context());
    Ok(Json(json!({
        "rendered": rendered,
        "invalid_variables": invalid,
        "valid": invalid.is_empty(),
    })))
}

/// Send a clearly-labelled test message through the configured channel.
pub async fn send_test(State(core): State<Arc<NocCore>>, actor: Actor) -> ApiResult<Json<Value>> {
    let tz: SystemTimezone = core.store.settings().get(KEY_SYSTEM_TIMEZONE).await?;
    let context = ContextBuilder::new(&tz)
        .actor(&actor.actor, &actor.role)
        .build();
    let sent = core.router.send_event(EventType::Test, &context).await;
    Ok(Json(json!({ "sent": sent })))
}
