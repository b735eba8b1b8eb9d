use anyhow::Result;
use bson::{doc, Bson};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::StructureEntry;

#[derive(Clone)]
pub struct EntryRepo {
    coll: Collection<StructureEntry>,
}

impl EntryRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("seo_structure_entries"),
        }
    }

    pub async fn insert(&self, entry: &StructureEntry) -> Result<()> {
        self.coll.insert_one(entry).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<StructureEntry>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn find_by_network(&self, network_id: &str) -> Result<Vec<StructureEntry>> {
        let cursor = self.coll.find(doc! { "network_id": network_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_domain(&self, asset_domain_id: &str) -> Result<Vec<StructureEntry>> {
        let cursor = self
            .coll
            .find(doc! { "asset_domain_id": asset_domain_id })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// All entries across every network. Used by the monitoring side to map
    /// domains into SEO usage.
    pub async fn find_all(&self) -> Result<Vec<StructureEntry>> {
        let cursor = self.coll.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Duplicate check for the (network, domain, normalized path) key.
    pub async fn find_by_placement(
        &self,
        network_id: &str,
        asset_domain_id: &str,
        optimized_path: Option<&str>,
    ) -> Result<Option<StructureEntry>> {
        let path = match optimized_path {
            Some(p) => Bson::String(p.to_string()),
            None => Bson::Null,
        };
        Ok(self
            .coll
            .find_one(doc! {
                "network_id": network_id,
                "asset_domain_id": asset_domain_id,
                "optimized_path": path,
            })
            .await?)
    }

    /// Full-document replace. Entries are small; the pipeline computes the
    /// updated entry and persists it atomically.
    pub async fn replace(&self, entry: &StructureEntry) -> Result<()> {
        self.coll
            .replace_one(doc! { "id": &entry.id }, entry)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.coll.delete_one(doc! { "id": id }).await?;
        Ok(())
    }

    pub async fn delete_by_network(&self, network_id: &str) -> Result<u64> {
        let result = self
            .coll
            .delete_many(doc! { "network_id": network_id })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn count_for_network(&self, network_id: &str) -> Result<u64> {
        Ok(self
            .coll
            .count_documents(doc! { "network_id": network_id })
            .await?)
    }

    /// Whether any structure entry references the domain.
    pub async fn domain_in_use(&self, asset_domain_id: &str) -> Result<bool> {
        let n = self
            .coll
            .count_documents(doc! { "asset_domain_id": asset_domain_id })
            .await?;
        Ok(n > 0)
    }
}
