use anyhow::Result;
use bson::doc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::Brand;

#[derive(Clone)]
pub struct BrandRepo {
    coll: Collection<Brand>,
}

impl BrandRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("brands"),
        }
    }

    pub async fn insert(&self, brand: &Brand) -> Result<()> {
        self.coll.insert_one(brand).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Brand>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    /// Brand display name with a stable fallback for notifications.
    pub async fn name_of(&self, id: &str) -> Result<String> {
        Ok(self
            .find_by_id(id)
            .await?
            .map(|b| b.name)
            .unwrap_or_else(|| "Unknown Brand".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Brand>> {
        let cursor = self.coll.find(doc! {}).sort(doc! { "name": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }
}
