//! Conflict → optimization linker integration tests against a local
//! MongoDB: detection storage, recurrence counting, cross-sync, approval.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use seonoc_common::types::*;
use seonoc_graph::testutil::{entry, main_entry, with_keyword, with_path};
use seonoc_graph::tiers::compute_tiers;
use seonoc_graph::{detect_conflicts, DetectedConflict};
use seonoc_linker::ConflictLinker;
use seonoc_notify::{NoopChat, NoopEmail, NotificationRouter};
use seonoc_store::{indexes, StoreClient};
use seonoc_templates::TemplateStore;

struct Harness {
    store: StoreClient,
    linker: ConflictLinker,
    network_id: String,
}

async fn harness() -> Harness {
    let db_name = format!("seonoc_test_{}", Uuid::new_v4().simple());
    let store = StoreClient::connect("mongodb://localhost:27017", &db_name)
        .await
        .expect("MongoDB must be running on localhost to run ignored tests");
    indexes::ensure_indexes(&store).await.unwrap();

    let brand = Brand {
        id: "brand-1".to_string(),
        name: "Acme".to_string(),
        created_at: Utc::now(),
    };
    store.brands().insert(&brand).await.unwrap();
    let network = SeoNetwork {
        id: "net-1".to_string(),
        brand_id: brand.id.clone(),
        name: "Net-1".to_string(),
        status: "active".to_string(),
        visibility_mode: VisibilityMode::BrandBased,
        manager_ids: vec![],
        created_by: "u1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.networks().insert(&network).await.unwrap();

    let templates = Arc::new(TemplateStore::new(store.templates()));
    let router = Arc::new(NotificationRouter::new(
        store.clone(),
        templates,
        Arc::new(NoopChat::default()),
        Arc::new(NoopEmail::default()),
    ));
    let linker = ConflictLinker::new(store.clone(), router);
    Harness {
        store,
        linker,
        network_id: network.id,
    }
}

fn domains() -> HashMap<String, String> {
    [
        ("d0".to_string(), "money.com".to_string()),
        ("d1".to_string(), "support.com".to_string()),
    ]
    .into()
}

fn cannibalized_entries(blog2_id: &str) -> Vec<StructureEntry> {
    vec![
        main_entry("m", "net-1", "d0"),
        with_keyword(
            with_path(entry("blog", "net-1", "d1", Some("m")), "/blog"),
            "slot bonus",
        ),
        with_keyword(
            with_path(entry(blog2_id, "net-1", "d1", Some("m")), "/blog2"),
            "slot bonus",
        ),
    ]
}

fn detect(entries: &[StructureEntry]) -> Vec<DetectedConflict> {
    let tiers = compute_tiers(entries);
    detect_conflicts(entries, &domains(), &tiers)
}

fn actor() -> ActorRef {
    ActorRef {
        user_id: "admin".to_string(),
        email: "admin@example.com".to_string(),
        display_name: "Admin".to_string(),
    }
}

/// A detected keyword cannibalization becomes a stored conflict under
/// review with a linked conflict-resolution optimization.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn detection_creates_conflict_and_linked_optimization() {
    let h = harness().await;
    let entries = cannibalized_entries("blog2");
    let detected = detect(&entries);
    let cannibalization: Vec<_> = detected
        .iter()
        .filter(|c| c.conflict_type == ConflictType::KeywordCannibalization)
        .cloned()
        .collect();
    assert_eq!(cannibalization.len(), 1);

    let summary = h
        .linker
        .process_detections(&h.network_id, &cannibalization)
        .await
        .unwrap();
    assert_eq!(summary.new_conflicts, 1);
    assert_eq!(summary.optimizations_created, 1);

    let conflicts = h.store.conflicts().find_by_network(&h.network_id).await.unwrap();
    assert_eq!(conflicts.len(), 1);
    let conflict = &conflicts[0];
    assert_eq!(conflict.conflict_type, ConflictType::KeywordCannibalization);
    assert_eq!(conflict.severity, Severity::High);
    assert_eq!(conflict.status, ConflictStatus::UnderReview);
    assert!(conflict.is_active);
    assert_eq!(conflict.recurrence_count, 0);

    let optimization = h
        .store
        .optimizations()
        .find_by_id(conflict.optimization_id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(optimization.title, "[Conflict Resolution] Keyword Cannibalization");
    assert_eq!(optimization.activity_type, "conflict_resolution");
    assert_eq!(optimization.priority, Some(Severity::High));
    assert_eq!(optimization.linked_conflict_id.as_deref(), Some(conflict.id.as_str()));
    assert_eq!(optimization.status, OptimizationStatus::Planned);
    assert_eq!(optimization.expected_impact, vec![ExpectedImpact::Authority]);
}

/// Re-running detection on an unchanged network is idempotent: same
/// fingerprints, no new conflicts.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn repeated_detection_is_idempotent() {
    let h = harness().await;
    let entries = cannibalized_entries("blog2");

    let first = detect(&entries);
    let second = detect(&entries);
    assert_eq!(first.len(), second.len());

    h.linker.process_detections(&h.network_id, &first).await.unwrap();
    let summary = h.linker.process_detections(&h.network_id, &second).await.unwrap();
    assert_eq!(summary.new_conflicts, 0);
    assert_eq!(summary.recurring_conflicts, 0);

    let conflicts = h.store.conflicts().find_by_network(&h.network_id).await.unwrap();
    assert_eq!(conflicts.len(), first.len());
}

/// Completing the optimization resolves the conflict; completing again is
/// a no-op; a structurally identical re-detection after a delete/re-create
/// counts exactly one recurrence.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn resolution_and_recurrence_flow() {
    let h = harness().await;
    let detected: Vec<_> = detect(&cannibalized_entries("blog2"))
        .into_iter()
        .filter(|c| c.conflict_type == ConflictType::KeywordCannibalization)
        .collect();
    h.linker.process_detections(&h.network_id, &detected).await.unwrap();

    let conflict = h.store.conflicts().find_by_network(&h.network_id).await.unwrap()[0].clone();
    let optimization = h
        .store
        .optimizations()
        .find_by_id(conflict.optimization_id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();

    // Complete the optimization → conflict resolved and deactivated.
    h.linker
        .on_optimization_status_changed(&optimization, OptimizationStatus::Completed, &actor())
        .await
        .unwrap();
    let resolved = h.store.conflicts().find_by_id(&conflict.id).await.unwrap().unwrap();
    assert_eq!(resolved.status, ConflictStatus::Resolved);
    assert!(!resolved.is_active);
    assert!(resolved.resolved_at.is_some());

    // Resolving twice is a no-op.
    h.linker
        .on_optimization_status_changed(&optimization, OptimizationStatus::Completed, &actor())
        .await
        .unwrap();
    let still = h.store.conflicts().find_by_id(&conflict.id).await.unwrap().unwrap();
    assert_eq!(still.recurrence_count, resolved.recurrence_count);
    assert_eq!(still.status, ConflictStatus::Resolved);

    // Delete blog2 and re-add it under a new entry id: the structural
    // fingerprint is identical, so this is recurrence #1.
    let re_detected: Vec<_> = detect(&cannibalized_entries("blog2-reborn"))
        .into_iter()
        .filter(|c| c.conflict_type == ConflictType::KeywordCannibalization)
        .collect();
    let summary = h
        .linker
        .process_detections(&h.network_id, &re_detected)
        .await
        .unwrap();
    assert_eq!(summary.recurring_conflicts, 1);
    assert_eq!(summary.new_conflicts, 0);

    let recurred = h.store.conflicts().find_by_id(&conflict.id).await.unwrap().unwrap();
    assert_eq!(recurred.recurrence_count, 1);
    assert_eq!(recurred.status, ConflictStatus::UnderReview); // fresh optimization linked
    assert!(recurred.is_active);
    assert!(recurred.last_recurrence_at.is_some());

    let fresh_opt = h
        .store
        .optimizations()
        .find_by_id(recurred.optimization_id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_ne!(fresh_opt.id, optimization.id);
    assert!(fresh_opt.title.contains("[RECURRING #1]"), "{}", fresh_opt.title);
}

/// Super-admin approval deactivates the conflict, resets the recurrence
/// counter and auto-completes the linked optimization.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn approval_resets_and_completes() {
    let h = harness().await;
    let detected: Vec<_> = detect(&cannibalized_entries("blog2"))
        .into_iter()
        .filter(|c| c.conflict_type == ConflictType::KeywordCannibalization)
        .collect();
    h.linker.process_detections(&h.network_id, &detected).await.unwrap();
    let conflict = h.store.conflicts().find_by_network(&h.network_id).await.unwrap()[0].clone();

    h.linker.approve_conflict(&conflict.id, &actor()).await.unwrap();

    let approved = h.store.conflicts().find_by_id(&conflict.id).await.unwrap().unwrap();
    assert_eq!(approved.status, ConflictStatus::Approved);
    assert!(!approved.is_active);
    assert_eq!(approved.recurrence_count, 0);

    let optimization = h
        .store
        .optimizations()
        .find_by_id(conflict.optimization_id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(optimization.status, OptimizationStatus::Completed);
}

/// Deleting the linked optimization reverts the conflict to `detected`
/// with no optimization attached.
#[tokio::test]
#[ignore = "requires MongoDB running on localhost"]
async fn optimization_delete_unlinks_conflict() {
    let h = harness().await;
    let detected: Vec<_> = detect(&cannibalized_entries("blog2"))
        .into_iter()
        .filter(|c| c.conflict_type == ConflictType::KeywordCannibalization)
        .collect();
    h.linker.process_detections(&h.network_id, &detected).await.unwrap();
    let conflict = h.store.conflicts().find_by_network(&h.network_id).await.unwrap()[0].clone();
    let optimization_id = conflict.optimization_id.clone().unwrap();

    h.linker.unlink_on_optimization_delete(&optimization_id).await.unwrap();
    h.store.optimizations().delete(&optimization_id).await.unwrap();

    let unlinked = h.store.conflicts().find_by_id(&conflict.id).await.unwrap().unwrap();
    assert_eq!(unlinked.status, ConflictStatus::Detected);
    assert!(unlinked.optimization_id.is_none());
    assert!(unlinked.is_active);
}
