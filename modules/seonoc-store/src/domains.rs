use anyhow::Result;
use bson::{doc, Bson};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::{AssetDomain, PingStatus, SoftBlockType};

#[derive(Clone)]
pub struct DomainRepo {
    coll: Collection<AssetDomain>,
}

impl DomainRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("asset_domains"),
        }
    }

    pub async fn insert(&self, domain: &AssetDomain) -> Result<()> {
        self.coll.insert_one(domain).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AssetDomain>> {
        Ok(self.coll.find_one(doc! { "id": id }).await?)
    }

    pub async fn find_by_name(&self, domain_name: &str) -> Result<Option<AssetDomain>> {
        Ok(self.coll.find_one(doc! { "domain_name": domain_name }).await?)
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<AssetDomain>> {
        let cursor = self.coll.find(doc! { "id": { "$in": ids } }).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Monitored domains due for a probe: never checked, or past their
    /// interval. The interval lives on the document, so the cheap filter is
    /// `monitoring_enabled` and the due-check happens in the caller.
    pub async fn find_monitored(&self) -> Result<Vec<AssetDomain>> {
        let cursor = self.coll.find(doc! { "monitoring_enabled": true }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_with_expiration(&self, exclude_auto_renew: bool) -> Result<Vec<AssetDomain>> {
        let mut filter = doc! { "expiration_date": { "$ne": Bson::Null } };
        if exclude_auto_renew {
            filter.insert("auto_renew", doc! { "$ne": true });
        }
        let cursor = self.coll.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_ping_status(&self, status: PingStatus) -> Result<Vec<AssetDomain>> {
        let cursor = self
            .coll
            .find(doc! { "monitoring_enabled": true, "ping_status": bson::to_bson(&status)? })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Atomic single-document probe-state update.
    pub async fn record_probe(
        &self,
        id: &str,
        status: PingStatus,
        http_code: Option<u16>,
        soft_block: Option<SoftBlockType>,
        checked_at: DateTime<Utc>,
    ) -> Result<()> {
        self.coll
            .update_one(
                doc! { "id": id },
                doc! { "$set": {
                    "ping_status": bson::to_bson(&status)?,
                    "last_http_code": http_code.map(|c| Bson::Int32(c as i32)).unwrap_or(Bson::Null),
                    "soft_block_type": bson::to_bson(&soft_block)?,
                    "last_checked_at": bson::to_bson(&checked_at)?,
                    "updated_at": bson::to_bson(&checked_at)?,
                }},
            )
            .await?;
        Ok(())
    }

    pub async fn set_monitoring(&self, id: &str, enabled: bool) -> Result<()> {
        self.coll
            .update_one(
                doc! { "id": id },
                doc! { "$set": {
                    "monitoring_enabled": enabled,
                    "updated_at": bson::to_bson(&Utc::now())?,
                }},
            )
            .await?;
        Ok(())
    }

    /// Callers must check `EntryRepo::domain_in_use` first; a domain
    /// referenced by any structure entry may not be deleted.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.coll.delete_one(doc! { "id": id }).await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.coll.count_documents(doc! {}).await?)
    }
}
