//! Repository integration tests against a local MongoDB.

use chrono::Utc;
use uuid::Uuid;

use seonoc_common::settings::{TelegramSeoSettings, KEY_TELEGRAM_SEO};
use seonoc_common::types::*;
use seonoc_store::{indexes, StoreClient};

async fn connect() -> StoreClient {
    let db_name = format!("seonoc_test_{}", Uuid::new_v4().simple());
    let store = StoreClient::connect("mongodb://localhost:27017", &db_name)
        .await
        .expect("MongoDB must be running on localhost to run ignored tests");
    indexes::ensure_indexes(&store).await.unwrap();
    store
}

fn domain(name: &str) -> AssetDomain {
    AssetDomain {
        id: Uuid::new_v4().to_string(),
        domain_name: name.to_string(),
        brand_id: "brand-1".to_string(),
        category_id: None,
        registrar_id: None,
        status: DomainStatus::Active,
        expiration_date: None,
        auto_renew: false,
        monitoring_enabled: true,
        monitoring_interval: MonitoringInterval::Hourly,
        ping_status: PingStatus::Unknown,
        last_http_code: None,
        last_checked_at: None,
        soft_block_type: None,
        domain_lifecycle_status: LifecycleStatus::Active,
        quarantine_category: None,
        quarantined_by: None,
        quarantined_at: None,
        released_by: None,
        released_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn domain_roundtrip_and_probe_state() {
    let store = connect().await;
    let d = domain("example.com");
    store.domains().insert(&d).await.unwrap();

    let loaded = store.domains().find_by_name("example.com").await.unwrap().unwrap();
    assert_eq!(loaded.id, d.id);
    assert_eq!(loaded.ping_status, PingStatus::Unknown);

    let now = Utc::now();
    store
        .domains()
        .record_probe(&d.id, PingStatus::SoftBlocked, Some(403), Some(SoftBlockType::Captcha), now)
        .await
        .unwrap();
    let probed = store.domains().find_by_id(&d.id).await.unwrap().unwrap();
    assert_eq!(probed.ping_status, PingStatus::SoftBlocked);
    assert_eq!(probed.last_http_code, Some(403));
    assert_eq!(probed.soft_block_type, Some(SoftBlockType::Captcha));
    assert!(probed.last_checked_at.is_some());
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn duplicate_domain_name_is_rejected_by_index() {
    let store = connect().await;
    store.domains().insert(&domain("dup.com")).await.unwrap();
    assert!(store.domains().insert(&domain("dup.com")).await.is_err());
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn placement_uniqueness_is_enforced_by_index() {
    let store = connect().await;
    let make = |id: &str| StructureEntry {
        id: id.to_string(),
        network_id: "net-1".to_string(),
        asset_domain_id: "d1".to_string(),
        optimized_path: Some("/blog".to_string()),
        domain_role: DomainRole::Supporting,
        domain_status: NodeStatus::Canonical,
        index_status: IndexStatus::Index,
        target_entry_id: None,
        ranking_position: None,
        primary_keyword: String::new(),
        ranking_url: String::new(),
        notes: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.entries().insert(&make("a")).await.unwrap();
    assert!(store.entries().insert(&make("b")).await.is_err());
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn settings_round_trip_with_defaults() {
    let store = connect().await;

    // Missing row falls back to defaults.
    let defaults: TelegramSeoSettings = store.settings().get(KEY_TELEGRAM_SEO).await.unwrap();
    assert!(defaults.bot_token.is_empty());
    assert!(defaults.enabled);

    let configured = TelegramSeoSettings {
        enabled: true,
        bot_token: "token".to_string(),
        chat_id: "chat".to_string(),
        enable_topic_routing: true,
        seo_change_topic_id: Some(42),
        leader_usernames: vec!["lead".to_string()],
        ..Default::default()
    };
    store.settings().put(KEY_TELEGRAM_SEO, &configured).await.unwrap();

    let loaded: TelegramSeoSettings = store.settings().get(KEY_TELEGRAM_SEO).await.unwrap();
    assert!(loaded.is_configured());
    assert_eq!(loaded.seo_change_topic_id, Some(42));
    assert_eq!(loaded.topic_id(TopicFamily::SeoChange), Some(42));
    assert_eq!(loaded.topic_id(TopicFamily::SeoReminder), None);
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn scheduler_state_marks_and_reads() {
    let store = connect().await;
    assert!(store.scheduler_state().last_run("expiration_daily").await.unwrap().is_none());
    let now = Utc::now();
    store.scheduler_state().mark_run("expiration_daily", now).await.unwrap();
    let read = store.scheduler_state().last_run("expiration_daily").await.unwrap().unwrap();
    assert_eq!(read.date_naive(), now.date_naive());
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn change_logs_sorted_and_delivery_state() {
    let store = connect().await;
    let mut ids = Vec::new();
    for i in 0..3 {
        let log = ChangeLog {
            id: Uuid::new_v4().to_string(),
            network_id: "net-1".to_string(),
            brand_id: "brand-1".to_string(),
            entry_id: Some("entry-1".to_string()),
            action_type: ActionType::UpdateNode,
            affected_node: format!("node-{i}"),
            actor_user_id: "u1".to_string(),
            actor_email: "u1@example.com".to_string(),
            change_note: "a perfectly valid rationale".to_string(),
            before_snapshot: None,
            after_snapshot: None,
            created_at: Utc::now() + chrono::Duration::milliseconds(i),
            notification_status: NotificationStatus::Pending,
            archived: false,
        };
        store.change_logs().insert(&log).await.unwrap();
        ids.push(log.id);
    }

    let logs = store.change_logs().list_by_network("net-1", 0, 10).await.unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].affected_node, "node-2"); // newest first

    store
        .change_logs()
        .set_notification_status(&ids[0], NotificationStatus::Failed)
        .await
        .unwrap();
    let failed = store.change_logs().list_failed().await.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, ids[0]);
}

#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn audit_query_filters_and_stats() {
    let store = connect().await;
    for (event, severity, success) in [
        ("template_change", AuditSeverity::Info, true),
        ("template_change", AuditSeverity::Info, true),
        ("notification_failed", AuditSeverity::Warning, false),
    ] {
        store
            .audit()
            .insert(&AuditEntry {
                id: Uuid::new_v4().to_string(),
                event_type: event.to_string(),
                actor_email: "admin@example.com".to_string(),
                resource: "template:telegram/seo_change".to_string(),
                details: String::new(),
                severity,
                success,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
    }

    let q = seonoc_store::audit::AuditQuery {
        event_type: Some("template_change".to_string()),
        limit: 10,
        ..Default::default()
    };
    assert_eq!(store.audit().query(&q).await.unwrap().len(), 2);

    let failures = seonoc_store::audit::AuditQuery {
        success: Some(false),
        limit: 10,
        ..Default::default()
    };
    assert_eq!(store.audit().query(&failures).await.unwrap().len(), 1);

    let stats = store.audit().stats(7).await.unwrap();
    assert_eq!(stats.get_i64("total").unwrap(), 3);
    assert_eq!(stats.get_i64("failures").unwrap(), 1);
}
