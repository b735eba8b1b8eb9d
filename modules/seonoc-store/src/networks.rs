use anyhow::Result;
use bson::doc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::SeoNetwork;

#[derive(Clone)]
pub struct NetworkRepo {
    coll: Collection<SeoNetwork>,
}

impl NetworkRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("seo_networks"),
        }
    }

    pub async fn insert(&self, network: &SeoNetwork) -> Result<()> {
        self.coll.insert_one(network).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<SeoNetwork>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn list_by_brand(&self, brand_id: &str) -> Result<Vec<SeoNetwork>> {
        let cursor = self
            .coll
            .find(doc! { "brand_id": brand_id })
            .sort(doc! { "name": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_all(&self) -> Result<Vec<SeoNetwork>> {
        let cursor = self.coll.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.coll.delete_one(doc! { "id": id }).await?;
        Ok(())
    }
}
