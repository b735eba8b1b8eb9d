use anyhow::Result;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::{Collection, Database};

use seonoc_common::types::SchedulerState;

/// Cross-restart dedup keys for the workers ("expiration:2026-08-01",
/// "unmonitored_reminders", ...).
#[derive(Clone)]
pub struct SchedulerStateRepo {
    coll: Collection<SchedulerState>,
}

impl SchedulerStateRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("scheduler_state"),
        }
    }

    pub async fn last_run(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .coll
            .find_one(doc! { "key": key })
            .await?
            .map(|s| s.last_run_at))
    }

    pub async fn mark_run(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        self.coll
            .update_one(
                doc! { "key": key },
                doc! { "$set": { "key": key, "last_run_at": bson::to_bson(&at)? } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }
}
