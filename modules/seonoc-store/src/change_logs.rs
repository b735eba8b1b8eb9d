use anyhow::Result;
use bson::doc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::{ChangeLog, NotificationStatus};

#[derive(Clone)]
pub struct ChangeLogRepo {
    coll: Collection<ChangeLog>,
}

impl ChangeLogRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("seo_change_logs"),
        }
    }

    /// Ledger rows are append-only; there is no update or delete here beyond
    /// the delivery-state field.
    pub async fn insert(&self, log: &ChangeLog) -> Result<()> {
        self.coll.insert_one(log).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ChangeLog>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn set_notification_status(
        &self,
        id: &str,
        status: NotificationStatus,
    ) -> Result<()> {
        self.coll
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "notification_status": bson::to_bson(&status)? } },
            )
            .await?;
        Ok(())
    }

    pub async fn list_by_network(
        &self,
        network_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<ChangeLog>> {
        let cursor = self
            .coll
            .find(doc! { "network_id": network_id, "archived": { "$ne": true } })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_entry(&self, entry_id: &str) -> Result<Vec<ChangeLog>> {
        let cursor = self
            .coll
            .find(doc! { "entry_id": entry_id })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_failed(&self) -> Result<Vec<ChangeLog>> {
        let cursor = self
            .coll
            .find(doc! { "notification_status": "failed" })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
