use anyhow::Result;
use bson::doc;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use tracing::info;

use crate::StoreClient;

/// Create the required indexes. Idempotent; runs at startup.
pub async fn ensure_indexes(store: &StoreClient) -> Result<()> {
    let db = store.inner();

    let unique = |keys: bson::Document| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };
    let plain = |keys: bson::Document| IndexModel::builder().keys(keys).build();

    db.collection::<bson::Document>("asset_domains")
        .create_indexes(vec![
            unique(doc! { "domain_name": 1 }),
            plain(doc! { "brand_id": 1 }),
        ])
        .await?;

    db.collection::<bson::Document>("seo_networks")
        .create_index(plain(doc! { "brand_id": 1 }))
        .await?;

    db.collection::<bson::Document>("seo_structure_entries")
        .create_indexes(vec![
            unique(doc! { "network_id": 1, "asset_domain_id": 1, "optimized_path": 1 }),
            plain(doc! { "target_entry_id": 1 }),
        ])
        .await?;

    db.collection::<bson::Document>("seo_change_logs")
        .create_index(plain(doc! { "network_id": 1, "created_at": 1 }))
        .await?;

    db.collection::<bson::Document>("seo_conflicts")
        .create_index(unique(doc! { "fingerprint": 1 }))
        .await?;

    db.collection::<bson::Document>("seo_optimizations")
        .create_index(plain(doc! { "network_id": 1, "status": 1 }))
        .await?;

    db.collection::<bson::Document>("audit_logs")
        .create_index(plain(doc! { "timestamp": 1, "event_type": 1 }))
        .await?;

    db.collection::<bson::Document>("notification_templates")
        .create_index(unique(doc! { "channel": 1, "event_type": 1 }))
        .await?;

    db.collection::<bson::Document>("settings")
        .create_index(unique(doc! { "key": 1 }))
        .await?;

    info!("Storage indexes ensured");
    Ok(())
}
