use anyhow::Result;
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::{Channel, EventType, NotificationTemplate};

#[derive(Clone)]
pub struct TemplateRepo {
    coll: Collection<NotificationTemplate>,
}

impl TemplateRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("notification_templates"),
        }
    }

    pub async fn insert(&self, template: &NotificationTemplate) -> Result<()> {
        self.coll.insert_one(template).await?;
        Ok(())
    }

    pub async fn find(
        &self,
        channel: Channel,
        event_type: EventType,
    ) -> Result<Option<NotificationTemplate>> {
        Ok(self
            .coll
            .find_one(doc! {
                "channel": bson::to_bson(&channel)?,
                "event_type": bson::to_bson(&event_type)?,
            })
            .await?)
    }

    pub async fn list(&self) -> Result<Vec<NotificationTemplate>> {
        let cursor = self
            .coll
            .find(doc! {})
            .sort(doc! { "channel": 1, "event_type": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update_body(
        &self,
        channel: Channel,
        event_type: EventType,
        body: &str,
        enabled: bool,
        updated_by: &str,
    ) -> Result<()> {
        self.coll
            .update_one(
                doc! {
                    "channel": bson::to_bson(&channel)?,
                    "event_type": bson::to_bson(&event_type)?,
                },
                doc! { "$set": {
                    "template_body": body,
                    "enabled": enabled,
                    "updated_at": bson::to_bson(&Utc::now())?,
                    "updated_by": updated_by,
                }},
            )
            .await?;
        Ok(())
    }

    /// Replace the body with the stored default.
    pub async fn reset(
        &self,
        channel: Channel,
        event_type: EventType,
        updated_by: &str,
    ) -> Result<Option<NotificationTemplate>> {
        let Some(existing) = self.find(channel, event_type).await? else {
            return Ok(None);
        };
        self.update_body(
            channel,
            event_type,
            &existing.default_template_body.clone(),
            true,
            updated_by,
        )
        .await?;
        self.find(channel, event_type).await
    }
}
