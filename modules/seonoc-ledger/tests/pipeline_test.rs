//! Change-pipeline integration tests against a local MongoDB.
//!
//! Each test gets its own database so runs don't interfere.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use seonoc_common::settings::{TelegramSeoSettings, KEY_TELEGRAM_SEO};
use seonoc_common::throttle::{throttle_key, Throttle};
use seonoc_common::types::*;
use seonoc_common::NocError;
use seonoc_graph::tiers::compute_tiers;
use seonoc_ledger::{ChangePipeline, NewNetworkInput, NodeInput};
use seonoc_notify::{NoopChat, NoopEmail, NotificationRouter};
use seonoc_store::{indexes, StoreClient};
use seonoc_templates::TemplateStore;

struct Harness {
    store: StoreClient,
    pipeline: ChangePipeline,
    chat: Arc<NoopChat>,
    throttle: Arc<Throttle>,
}

async fn harness() -> Harness {
    let db_name = format!("seonoc_test_{}", Uuid::new_v4().simple());
    let store = StoreClient::connect("mongodb://localhost:27017", &db_name)
        .await
        .expect("MongoDB must be running on localhost to run ignored tests");
    indexes::ensure_indexes(&store).await.unwrap();

    // Configure the chat channel so sends reach the noop backend.
    store
        .settings()
        .put(
            KEY_TELEGRAM_SEO,
            &TelegramSeoSettings {
                enabled: true,
                bot_token: "test-token".to_string(),
                chat_id: "test-chat".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let chat = Arc::new(NoopChat::default());
    let templates = Arc::new(TemplateStore::new(store.templates()));
    let router = Arc::new(NotificationRouter::new(
        store.clone(),
        templates,
        chat.clone(),
        Arc::new(NoopEmail::default()),
    ));
    let throttle = Arc::new(Throttle::new());
    let pipeline = ChangePipeline::new(store.clone(), router, throttle.clone());
    Harness {
        store,
        pipeline,
        chat,
        throttle,
    }
}

fn actor() -> ActorRef {
    ActorRef {
        user_id: "u1".to_string(),
        email: "jane@example.com".to_string(),
        display_name: "Jane".to_string(),
    }
}

async fn seed_brand_and_domains(h: &Harness) -> (String, String, String) {
    let brand = Brand {
        id: Uuid::new_v4().to_string(),
        name: "Acme".to_string(),
        created_at: Utc::now(),
    };
    h.store.brands().insert(&brand).await.unwrap();

    let mut ids = Vec::new();
    for name in ["money.com", "support.com"] {
        let domain = AssetDomain {
            id: Uuid::new_v4().to_string(),
            domain_name: name.to_string(),
            brand_id: brand.id.clone(),
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
        };
        h.store.domains().insert(&domain).await.unwrap();
        ids.push(domain.id);
    }
    (brand.id, ids[0].clone(), ids[1].clone())
}

fn node_input(domain_id: &str, change_note: &str) -> NodeInput {
    NodeInput {
        asset_domain_id: domain_id.to_string(),
        optimized_path: None,
        domain_role: DomainRole::Supporting,
        domain_status: NodeStatus::Canonical,
        index_status: IndexStatus::Index,
        target_entry_id: None,
        ranking_position: None,
        primary_keyword: String::new(),
        ranking_url: String::new(),
        notes: String::new(),
        change_note: change_note.to_string(),
    }
}

/// Create and wire a network, then check nodes, ledger rows and the
/// rendered chat message.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn create_and_wire_network() {
    let h = harness().await;
    let (brand_id, money_id, support_id) = seed_brand_and_domains(&h).await;

    let network = h
        .pipeline
        .create_network(
            &actor(),
            NewNetworkInput {
                brand_id,
                name: "Net-1".to_string(),
                visibility_mode: VisibilityMode::BrandBased,
                manager_ids: vec![],
                change_note: "initial network bring-up".to_string(),
            },
        )
        .await
        .unwrap();

    h.throttle.clear(&throttle_key("net", &network.id));
    let main = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                domain_role: DomainRole::Main,
                domain_status: NodeStatus::Primary,
                ..node_input(&money_id, "establish the money site")
            },
        )
        .await
        .unwrap();

    h.throttle.clear(&throttle_key("net", &network.id));
    let supporter = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                optimized_path: Some("/blog".to_string()),
                target_entry_id: Some(main.id.clone()),
                ..node_input(&support_id, "add T1 supporter")
            },
        )
        .await
        .unwrap();

    // Two nodes, tiers main=0 / supporter=1.
    let entries = h.store.entries().find_by_network(&network.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    let tiers = compute_tiers(&entries);
    assert_eq!(tiers.tier(&main.id), Some(0));
    assert_eq!(tiers.tier(&supporter.id), Some(1));

    // Ledger: create_network + two create_node rows, in order.
    let logs = h
        .store
        .change_logs()
        .list_by_network(&network.id, 0, 10)
        .await
        .unwrap();
    let mut actions: Vec<ActionType> = logs.iter().map(|l| l.action_type).collect();
    actions.reverse();
    assert_eq!(
        actions,
        vec![ActionType::CreateNetwork, ActionType::CreateNode, ActionType::CreateNode]
    );

    // The rendered chat message carries the full authority chain.
    let sent = h.chat.sent.lock().unwrap();
    let last = sent.last().expect("a chat message was sent");
    assert!(
        last.text
            .contains("support.com/blog [Canonical] → money.com [Primary]"),
        "chain missing from message:\n{}",
        last.text
    );
}

/// A rationale under 10 chars mutates nothing and writes no ledger row.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn rationale_enforcement_blocks_write_and_ledger() {
    let h = harness().await;
    let (brand_id, money_id, support_id) = seed_brand_and_domains(&h).await;
    let network = h
        .pipeline
        .create_network(
            &actor(),
            NewNetworkInput {
                brand_id,
                name: "Net-1".to_string(),
                visibility_mode: VisibilityMode::BrandBased,
                manager_ids: vec![],
                change_note: "initial network bring-up".to_string(),
            },
        )
        .await
        .unwrap();
    let main = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                domain_role: DomainRole::Main,
                domain_status: NodeStatus::Primary,
                ..node_input(&money_id, "establish the money site")
            },
        )
        .await
        .unwrap();
    let supporter = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                optimized_path: Some("/blog".to_string()),
                target_entry_id: Some(main.id.clone()),
                ..node_input(&support_id, "add T1 supporter")
            },
        )
        .await
        .unwrap();
    let logs_before = h
        .store
        .change_logs()
        .list_by_network(&network.id, 0, 50)
        .await
        .unwrap()
        .len();

    let err = h
        .pipeline
        .update_node(
            &actor(),
            &supporter.id,
            NodeInput {
                optimized_path: Some("/blog2".to_string()),
                target_entry_id: Some(main.id.clone()),
                ..node_input(&support_id, "fix")
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NocError::Validation(_)));

    // No mutation, no ledger row.
    let unchanged = h.store.entries().find_by_id(&supporter.id).await.unwrap().unwrap();
    assert_eq!(unchanged.optimized_path.as_deref(), Some("/blog"));
    let logs_after = h
        .store
        .change_logs()
        .list_by_network(&network.id, 0, 50)
        .await
        .unwrap()
        .len();
    assert_eq!(logs_before, logs_after);
}

/// Every successful write has exactly one matching ledger row whose
/// after_snapshot equals the persisted entity.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn ledger_row_matches_persisted_entity() {
    let h = harness().await;
    let (brand_id, money_id, support_id) = seed_brand_and_domains(&h).await;
    let network = h
        .pipeline
        .create_network(
            &actor(),
            NewNetworkInput {
                brand_id,
                name: "Net-1".to_string(),
                visibility_mode: VisibilityMode::BrandBased,
                manager_ids: vec![],
                change_note: "initial network bring-up".to_string(),
            },
        )
        .await
        .unwrap();
    let main = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                domain_role: DomainRole::Main,
                domain_status: NodeStatus::Primary,
                ..node_input(&money_id, "establish the money site")
            },
        )
        .await
        .unwrap();
    let supporter = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                optimized_path: Some("/blog".to_string()),
                target_entry_id: Some(main.id.clone()),
                ..node_input(&support_id, "add T1 supporter")
            },
        )
        .await
        .unwrap();

    h.pipeline
        .update_node(
            &actor(),
            &supporter.id,
            NodeInput {
                optimized_path: Some("/blog".to_string()),
                target_entry_id: Some(main.id.clone()),
                primary_keyword: "slot bonus".to_string(),
                ..node_input(&support_id, "set the primary keyword")
            },
        )
        .await
        .unwrap();

    let logs = h.store.change_logs().find_by_entry(&supporter.id).await.unwrap();
    assert_eq!(logs.len(), 2); // create + update

    let persisted = h.store.entries().find_by_id(&supporter.id).await.unwrap().unwrap();
    let last = logs.last().unwrap();
    assert_eq!(last.action_type, ActionType::UpdateNode);
    match last.after_snapshot.as_ref().unwrap() {
        ChangeSnapshot::Entry(snapshot) => {
            assert_eq!(snapshot, &EntrySnapshot::from(&persisted));
        }
        other => panic!("expected entry snapshot, got {other:?}"),
    }
}

/// No-change save is rejected as a first-class validation error.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn no_change_save_is_rejected() {
    let h = harness().await;
    let (brand_id, money_id, _) = seed_brand_and_domains(&h).await;
    let network = h
        .pipeline
        .create_network(
            &actor(),
            NewNetworkInput {
                brand_id,
                name: "Net-1".to_string(),
                visibility_mode: VisibilityMode::BrandBased,
                manager_ids: vec![],
                change_note: "initial network bring-up".to_string(),
            },
        )
        .await
        .unwrap();
    let main = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                domain_role: DomainRole::Main,
                domain_status: NodeStatus::Primary,
                ..node_input(&money_id, "establish the money site")
            },
        )
        .await
        .unwrap();

    let err = h
        .pipeline
        .update_node(
            &actor(),
            &main.id,
            NodeInput {
                domain_role: DomainRole::Main,
                domain_status: NodeStatus::Primary,
                ..node_input(&money_id, "no actual change here")
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NocError::Validation(m) if m.contains("no changes")));
}

/// The main switch demotes, promotes, recomputes tiers, and writes two
/// ledger rows under the shared rationale.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn main_switch_flow() {
    let h = harness().await;
    let (brand_id, money_id, support_id) = seed_brand_and_domains(&h).await;
    let network = h
        .pipeline
        .create_network(
            &actor(),
            NewNetworkInput {
                brand_id,
                name: "Net-1".to_string(),
                visibility_mode: VisibilityMode::BrandBased,
                manager_ids: vec![],
                change_note: "initial network bring-up".to_string(),
            },
        )
        .await
        .unwrap();
    let old_main = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                domain_role: DomainRole::Main,
                domain_status: NodeStatus::Primary,
                ..node_input(&money_id, "establish the money site")
            },
        )
        .await
        .unwrap();
    let blog = h
        .pipeline
        .create_node(
            &actor(),
            &network.id,
            NodeInput {
                optimized_path: Some("/blog".to_string()),
                target_entry_id: Some(old_main.id.clone()),
                ..node_input(&support_id, "add T1 supporter")
            },
        )
        .await
        .unwrap();

    let logs_before = h
        .store
        .change_logs()
        .list_by_network(&network.id, 0, 50)
        .await
        .unwrap()
        .len();

    h.pipeline
        .switch_main(&actor(), &network.id, &blog.id, "promote the blog to main")
        .await
        .unwrap();

    let new_main = h.store.entries().find_by_id(&blog.id).await.unwrap().unwrap();
    assert_eq!(new_main.domain_role, DomainRole::Main);
    assert_eq!(new_main.domain_status, NodeStatus::Primary);
    assert!(new_main.target_entry_id.is_none());

    let demoted = h.store.entries().find_by_id(&old_main.id).await.unwrap().unwrap();
    assert_eq!(demoted.domain_role, DomainRole::Supporting);
    assert_eq!(demoted.domain_status, NodeStatus::Canonical);
    assert_eq!(demoted.target_entry_id.as_deref(), Some(blog.id.as_str()));

    // Node set unchanged; only roles, statuses and one target differ.
    let entries = h.store.entries().find_by_network(&network.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    let tiers = compute_tiers(&entries);
    assert_eq!(tiers.tier(&blog.id), Some(0));
    assert_eq!(tiers.tier(&old_main.id), Some(1));

    let logs = h
        .store
        .change_logs()
        .list_by_network(&network.id, 0, 50)
        .await
        .unwrap();
    assert_eq!(logs.len(), logs_before + 2);
    for log in logs.iter().take(2) {
        assert_eq!(log.action_type, ActionType::ChangeRole);
        assert_eq!(log.change_note, "promote the blog to main");
    }
}
