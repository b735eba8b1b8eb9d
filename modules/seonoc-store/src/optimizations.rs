use anyhow::Result;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::{Optimization, OptimizationStatus};

#[derive(Clone)]
pub struct OptimizationRepo {
    coll: Collection<Optimization>,
}

impl OptimizationRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("seo_optimizations"),
        }
    }

    pub async fn insert(&self, optimization: &Optimization) -> Result<()> {
        self.coll.insert_one(optimization).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Optimization>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn apply(&self, id: &str, set: Document) -> Result<()> {
        self.coll
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    pub async fn list_by_network(
        &self,
        network_id: &str,
        status: Option<OptimizationStatus>,
    ) -> Result<Vec<Optimization>> {
        let mut filter = doc! { "network_id": network_id };
        if let Some(s) = status {
            filter.insert("status", bson::to_bson(&s)?);
        }
        let cursor = self
            .coll
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_in_progress(&self) -> Result<Vec<Optimization>> {
        let cursor = self.coll.find(doc! { "status": "in_progress" }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn set_last_reminder(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        self.coll
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "last_reminder_sent_at": bson::to_bson(&at)? } },
            )
            .await?;
        Ok(())
    }

    pub async fn push_response(
        &self,
        id: &str,
        response: &seonoc_common::types::TeamResponse,
    ) -> Result<()> {
        self.coll
            .update_one(
                doc! { "id": id },
                doc! { "$push": { "responses": bson::to_bson(response)? } },
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.coll.delete_one(doc! { "id": id }).await?;
        Ok(())
    }
}
