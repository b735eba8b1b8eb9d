use anyhow::Result;
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::{Conflict, ConflictStatus, Severity};

#[derive(Clone)]
pub struct ConflictRepo {
    coll: Collection<Conflict>,
}

impl ConflictRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("seo_conflicts"),
        }
    }

    pub async fn insert(&self, conflict: &Conflict) -> Result<()> {
        self.coll.insert_one(conflict).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Conflict>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn find_by_network(&self, network_id: &str) -> Result<Vec<Conflict>> {
        let cursor = self.coll.find(doc! { "network_id": network_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_optimization(&self, optimization_id: &str) -> Result<Option<Conflict>> {
        Ok(self
            .coll
            .find_one(doc! { "optimization_id": optimization_id })
            .await?)
    }

    /// Conflicts are never deleted; all mutation goes through `$set`.
    pub async fn apply(&self, id: &str, set: Document) -> Result<()> {
        self.coll
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    pub async fn list(
        &self,
        network_id: Option<&str>,
        status: Option<ConflictStatus>,
        severity: Option<Severity>,
        limit: i64,
    ) -> Result<Vec<Conflict>> {
        let mut filter = doc! {};
        if let Some(n) = network_id {
            filter.insert("network_id", n);
        }
        if let Some(s) = status {
            filter.insert("status", bson::to_bson(&s)?);
        }
        if let Some(s) = severity {
            filter.insert("severity", bson::to_bson(&s)?);
        }
        let cursor = self
            .coll
            .find(filter)
            .sort(doc! { "detected_at": -1 })
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_detected_since(
        &self,
        network_id: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<Vec<Conflict>> {
        let mut filter = doc! { "detected_at": { "$gte": bson::to_bson(&since)? } };
        if let Some(n) = network_id {
            filter.insert("network_id", Bson::String(n.to_string()));
        }
        let cursor = self.coll.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }
}
