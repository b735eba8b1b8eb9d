use anyhow::Result;
use bson::{doc, Document};
use chrono::{Duration, Utc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::{AuditEntry, AuditSeverity};

/// Filters for the audit query endpoint. All optional.
#[derive(Debug, Default, Clone)]
pub struct AuditQuery {
    pub event_type: Option<String>,
    pub actor_email: Option<String>,
    pub resource: Option<String>,
    pub severity: Option<AuditSeverity>,
    pub success: Option<bool>,
    pub skip: u64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct AuditRepo {
    coll: Collection<AuditEntry>,
}

impl AuditRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("audit_logs"),
        }
    }

    pub async fn insert(&self, entry: &AuditEntry) -> Result<()> {
        self.coll.insert_one(entry).await?;
        Ok(())
    }

    pub async fn query(&self, q: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let mut filter = doc! {};
        if let Some(v) = &q.event_type {
            filter.insert("event_type", v);
        }
        if let Some(v) = &q.actor_email {
            filter.insert("actor_email", v);
        }
        if let Some(v) = &q.resource {
            filter.insert("resource", v);
        }
        if let Some(v) = q.severity {
            filter.insert("severity", bson::to_bson(&v)?);
        }
        if let Some(v) = q.success {
            filter.insert("success", v);
        }
        let limit = if q.limit <= 0 { 100 } else { q.limit };
        let cursor = self
            .coll
            .find(filter)
            .sort(doc! { "timestamp": -1 })
            .skip(q.skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Counts grouped by event_type and severity over the last `days` days.
    pub async fn stats(&self, days: i64) -> Result<Document> {
        let since = Utc::now() - Duration::days(days);
        let since = bson::to_bson(&since)?;

        let pipeline = vec![
            doc! { "$match": { "timestamp": { "$gte": &since } } },
            doc! { "$group": {
                "_id": { "event_type": "$event_type", "severity": "$severity" },
                "count": { "$sum": 1 },
                "failures": { "$sum": { "$cond": ["$success", 0, 1] } },
            }},
        ];
        let rows: Vec<Document> = self
            .coll
            .clone_with_type::<Document>()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        let mut by_event = Document::new();
        let mut by_severity = Document::new();
        let mut total = 0i64;
        let mut failures = 0i64;
        for row in &rows {
            let count = row.get_i64("count").unwrap_or_else(|_| {
                row.get_i32("count").map(i64::from).unwrap_or_default()
            });
            let failed = row.get_i64("failures").unwrap_or_else(|_| {
                row.get_i32("failures").map(i64::from).unwrap_or_default()
            });
            total += count;
            failures += failed;
            if let Ok(id) = row.get_document("_id") {
                if let Ok(event) = id.get_str("event_type") {
                    let prev = by_event.get_i64(event).unwrap_or(0);
                    by_event.insert(event, prev + count);
                }
                if let Ok(severity) = id.get_str("severity") {
                    let prev = by_severity.get_i64(severity).unwrap_or(0);
                    by_severity.insert(severity, prev + count);
                }
            }
        }

        Ok(doc! {
            "period_days": days,
            "total": total,
            "failures": failures,
            "by_event_type": by_event,
            "by_severity": by_severity,
        })
    }
}
