use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use seonoc_common::types::{AuditEntry, AuditSeverity};
use seonoc_store::StoreClient;

/// Append an audit row. Audit failures are logged, never propagated; an
/// unreachable audit collection must not take the primary operation down.
pub async fn record_audit(
    store: &StoreClient,
    event_type: &str,
    actor_email: &str,
    resource: &str,
    details: &str,
    severity: AuditSeverity,
    success: bool,
) {
    let entry = AuditEntry {
        id: Uuid::new_v4().to_string(),
        event_type: event_type.to_string(),
        actor_email: actor_email.to_string(),
        resource: resource.to_string(),
        details: details.to_string(),
        severity,
        success,
        timestamp: Utc::now(),
    };
    if let Err(e) = store.audit().insert(&entry).await {
        warn!(error = %e, event_type, "Failed to write audit entry");
    }
}
