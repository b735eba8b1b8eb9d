use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use seonoc_common::settings::{
    EmailAlertSettings, MonitoringConfig, OptimizationReminderSettings, SystemTimezone,
    TelegramMonitoringSettings, TelegramSeoSettings, WeeklyDigestSettings, KEY_EMAIL_ALERTS,
    KEY_MONITORING_CONFIG, KEY_OPTIMIZATION_REMINDERS, KEY_SYSTEM_TIMEZONE,
    KEY_TELEGRAM_MONITORING, KEY_TELEGRAM_SEO, KEY_WEEKLY_DIGEST,
};
use seonoc_common::types::AuditSeverity;
use seonoc_common::NocError;
use seonoc_ledger::record_audit;

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::state::NocCore;

/// Deserialize into the typed settings struct so bad payloads fail before
/// anything is written, then re-serialize. Returns the effective value.
async fn validate_and_store(core: &NocCore, key: &str, body: Value) -> Result<Value, NocError> {
    fn check<T: serde::de::DeserializeOwned + serde::Serialize>(
        body: Value,
    ) -> Result<T, NocError> {
        serde_json::from_value(body)
            .map_err(|e| NocError::validation(format!("invalid settings payload: {e}")))
    }

    let normalized: Value = match key {
        KEY_TELEGRAM_SEO => serde_json::to_value(check::<TelegramSeoSettings>(body)?),
        KEY_TELEGRAM_MONITORING => serde_json::to_value(check::<TelegramMonitoringSettings>(body)?),
        KEY_EMAIL_ALERTS => serde_json::to_value(check::<EmailAlertSettings>(body)?),
        KEY_WEEKLY_DIGEST => {
            let digest = check::<WeeklyDigestSettings>(body)?;
            if digest.weekday().is_none() {
                return Err(NocError::validation(format!(
                    "invalid schedule_day: {}",
                    digest.schedule_day
                )));
            }
            if digest.schedule_hour > 23 {
                return Err(NocError::validation("schedule_hour must be 0-23"));
            }
            if digest.schedule_minute > 59 {
                return Err(NocError::validation("schedule_minute must be 0-59"));
            }
            serde_json::to_value(digest)
        }
        KEY_OPTIMIZATION_REMINDERS => {
            let reminders = check::<OptimizationReminderSettings>(body)?;
            if !(1..=30).contains(&reminders.interval_days) {
                return Err(NocError::validation("interval_days must be 1-30"));
            }
            serde_json::to_value(reminders)
        }
        KEY_MONITORING_CONFIG => serde_json::to_value(check::<MonitoringConfig>(body)?),
        KEY_SYSTEM_TIMEZONE => serde_json::to_value(check::<SystemTimezone>(body)?),
        other => return Err(NocError::not_found(format!("settings key {other}"))),
    }
    .map_err(|e| NocError::Internal(e.into()))?;

    core.store
        .settings()
        .put(key, &normalized)
        .await
        .map_err(NocError::Internal)?;
    Ok(normalized)
}

pub async fn get_settings(
    State(core): State<Arc<NocCore>>,
    _actor: Actor,
    Path(key): Path<String>,
) -> ApiResult<Json<Value>> {
    let value: Value = match key.as_str() {
        KEY_TELEGRAM_SEO => to_value(core.store.settings().get::<TelegramSeoSettings>(&key).await?)?,
        KEY_TELEGRAM_MONITORING => {
            to_value(core.store.settings().get::<TelegramMonitoringSettings>(&key).await?)?
        }
        KEY_EMAIL_ALERTS => to_value(core.store.settings().get::<EmailAlertSettings>(&key).await?)?,
        KEY_WEEKLY_DIGEST => to_value(core.store.settings().get::<WeeklyDigestSettings>(&key).await?)?,
        KEY_OPTIMIZATION_REMINDERS => {
            to_value(core.store.settings().get::<OptimizationReminderSettings>(&key).await?)?
        }
        KEY_MONITORING_CONFIG => to_value(core.store.settings().get::<MonitoringConfig>(&key).await?)?,
        KEY_SYSTEM_TIMEZONE => to_value(core.store.settings().get::<SystemTimezone>(&key).await?)?,
        other => return Err(NocError::not_found(format!("settings key {other}")).into()),
    };
    Ok(Json(value))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, NocError> {
    serde_json::to_value(value).map_err(|e| NocError::Internal(e.into()))
}

pub async fn put_settings(
    State(core): State<Arc<NocCore>>,
    actor: Actor,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    if !actor.is_super_admin() {
        return Err(NocError::Authorization(
            "only super admins may change settings".to_string(),
        )
        .into());
    }
    let effective = validate_and_store(&core, &key, body).await?;
    record_audit(
        &core.store,
        "settings_change",
        &actor.actor.email,
        &format!("settings:{key}"),
        "settings row updated",
        AuditSeverity::Info,
        true,
    )
    .await;
    Ok(Json(effective))
}
