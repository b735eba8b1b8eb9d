use anyhow::Result;
use bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// One document per settings key. Values are flattened next to the `key`
/// field so the admin UI can patch individual fields with `$set`.
#[derive(Clone)]
pub struct SettingsRepo {
    coll: Collection<Document>,
}

impl SettingsRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("settings"),
        }
    }

    /// Read a settings row, falling back to the type's defaults when the row
    /// is missing. Settings are read fresh at every event, no caching.
    pub async fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(mut document) = self.coll.find_one(doc! { "key": key }).await? else {
            return Ok(T::default());
        };
        document.remove("_id");
        document.remove("key");
        Ok(bson::from_document(document)?)
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut document = bson::to_document(value)?;
        document.insert("key", key);
        self.coll
            .update_one(doc! { "key": key }, doc! { "$set": document })
            .upsert(true)
            .await?;
        Ok(())
    }
}
