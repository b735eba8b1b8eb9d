//! Monitoring compliance queries against a local MongoDB.

use chrono::Utc;
use uuid::Uuid;

use seonoc_common::types::*;
use seonoc_monitor::{coverage_summary, list_unmonitored};
use seonoc_store::{indexes, StoreClient};

async fn connect() -> StoreClient {
    let db_name = format!("seonoc_test_{}", Uuid::new_v4().simple());
    let store = StoreClient::connect("mongodb://localhost:27017", &db_name)
        .await
        .expect("MongoDB must be running on localhost to run ignored tests");
    indexes::ensure_indexes(&store).await.unwrap();
    store
}

fn domain(name: &str, monitored: bool, lifecycle: LifecycleStatus) -> AssetDomain {
    AssetDomain {
        id: Uuid::new_v4().to_string(),
        domain_name: name.to_string(),
        brand_id: "brand-1".to_string(),
        category_id: None,
        registrar_id: None,
        status: DomainStatus::Active,
        expiration_date: None,
        auto_renew: false,
        monitoring_enabled: monitored,
        monitoring_interval: MonitoringInterval::Hourly,
        ping_status: PingStatus::Unknown,
        last_http_code: None,
        last_checked_at: None,
        soft_block_type: None,
        domain_lifecycle_status: lifecycle,
        quarantine_category: None,
        quarantined_by: None,
        quarantined_at: None,
        released_by: None,
        released_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn entry_for(domain_id: &str, network_id: &str, role: DomainRole) -> StructureEntry {
    StructureEntry {
        id: Uuid::new_v4().to_string(),
        network_id: network_id.to_string(),
        asset_domain_id: domain_id.to_string(),
        optimized_path: None,
        domain_role: role,
        domain_status: if role == DomainRole::Main {
            NodeStatus::Primary
        } else {
            NodeStatus::Canonical
        },
        index_status: IndexStatus::Index,
        target_entry_id: None,
        ranking_position: None,
        primary_keyword: String::new(),
        ranking_url: String::new(),
        notes: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn seed_network(store: &StoreClient, id: &str, name: &str) {
    store
        .networks()
        .insert(&SeoNetwork {
            id: id.to_string(),
            brand_id: "brand-1".to_string(),
            name: name.to_string(),
            status: "active".to_string(),
            visibility_mode: VisibilityMode::BrandBased,
            manager_ids: vec![],
            created_by: "u1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
}

/// A domain used in a network with monitoring disabled and an active
/// lifecycle lands in the unmonitored-in-seo list.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn unmonitored_domains_in_seo_are_reported() {
    let store = connect().await;
    seed_network(&store, "net-1", "Net-1").await;
    seed_network(&store, "net-2", "Net-2").await;

    let monitored = domain("watched.com", true, LifecycleStatus::Active);
    let unmonitored = domain("blind.com", false, LifecycleStatus::Active);
    let archived = domain("archived.com", false, LifecycleStatus::Archived);
    let outside = domain("outside.com", false, LifecycleStatus::Active);
    for d in [&monitored, &unmonitored, &archived, &outside] {
        store.domains().insert(d).await.unwrap();
    }

    store.entries().insert(&entry_for(&monitored.id, "net-1", DomainRole::Main)).await.unwrap();
    store
        .entries()
        .insert(&entry_for(&unmonitored.id, "net-1", DomainRole::Supporting))
        .await
        .unwrap();
    store
        .entries()
        .insert(&entry_for(&unmonitored.id, "net-2", DomainRole::Supporting))
        .await
        .unwrap();
    store
        .entries()
        .insert(&entry_for(&archived.id, "net-1", DomainRole::Supporting))
        .await
        .unwrap();

    let list = list_unmonitored(&store).await.unwrap();
    assert_eq!(list.len(), 1, "only the active unmonitored in-SEO domain: {list:?}");
    let item = &list[0];
    assert_eq!(item.domain_name, "blind.com");
    assert!(!item.monitoring_enabled);
    assert_eq!(item.network_count, 2);
    assert_eq!(item.networks_used_in, vec!["Net-1", "Net-2"]);
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn coverage_summary_counts_seo_domains_only() {
    let store = connect().await;
    seed_network(&store, "net-1", "Net-1").await;

    let a = domain("a.com", true, LifecycleStatus::Active);
    let b = domain("b.com", false, LifecycleStatus::Active);
    let unused = domain("unused.com", false, LifecycleStatus::Active);
    for d in [&a, &b, &unused] {
        store.domains().insert(d).await.unwrap();
    }
    store.entries().insert(&entry_for(&a.id, "net-1", DomainRole::Main)).await.unwrap();
    store.entries().insert(&entry_for(&b.id, "net-1", DomainRole::Supporting)).await.unwrap();

    let summary = coverage_summary(&store).await.unwrap();
    assert_eq!(summary["total_seo_domains"], 2);
    assert_eq!(summary["monitored"], 1);
    assert_eq!(summary["unmonitored"], 1);
    assert_eq!(summary["monitoring_coverage"], 50.0);
}
