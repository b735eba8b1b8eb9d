use anyhow::Result;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::Complaint;

#[derive(Clone)]
pub struct ComplaintRepo {
    coll: Collection<Complaint>,
}

impl ComplaintRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("seo_complaints"),
        }
    }

    pub async fn insert(&self, complaint: &Complaint) -> Result<()> {
        self.coll.insert_one(complaint).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn apply(&self, id: &str, set: Document) -> Result<()> {
        self.coll
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    pub async fn list_by_network(&self, network_id: &str) -> Result<Vec<Complaint>> {
        let cursor = self
            .coll
            .find(doc! { "network_id": network_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_by_optimization(&self, optimization_id: &str) -> Result<Vec<Complaint>> {
        let cursor = self
            .coll
            .find(doc! { "optimization_id": optimization_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
