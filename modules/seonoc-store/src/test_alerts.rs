use anyhow::Result;
use bson::doc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use seonoc_common::types::TestAlertRecord;

#[derive(Clone)]
pub struct TestAlertRepo {
    coll: Collection<TestAlertRecord>,
}

impl TestAlertRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("test_alerts"),
        }
    }

    pub async fn insert(&self, record: &TestAlertRecord) -> Result<()> {
        self.coll.insert_one(record).await?;
        Ok(())
    }

    pub async fn history(
        &self,
        limit: i64,
        domain_contains: Option<&str>,
    ) -> Result<Vec<TestAlertRecord>> {
        let mut filter = doc! {};
        if let Some(fragment) = domain_contains {
            // Substring match, case-insensitive, on the domain field.
            filter.insert(
                "domain",
                doc! { "$regex": regex_escape(fragment), "$options": "i" },
            );
        }
        let limit = if limit <= 0 { 50 } else { limit };
        let cursor = self
            .coll
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

/// Escape regex metacharacters so a filter fragment matches literally.
fn regex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_escape_passes_plain_text() {
        assert_eq!(regex_escape("filter-test"), "filter-test");
    }

    #[test]
    fn regex_escape_quotes_metachars() {
        assert_eq!(regex_escape("a.b"), "a\\.b");
        assert_eq!(regex_escape("x(y)"), "x\\(y\\)");
    }
}
