use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::NocCore;

pub mod audit;
pub mod changes;
pub mod complaints;
pub mod conflicts;
pub mod domains;
pub mod monitoring;
pub mod networks;
pub mod nodes;
pub mod optimizations;
pub mod settings;
pub mod templates;

pub fn router(core: Arc<NocCore>) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        // Networks & graph
        .route("/api/networks", post(networks::create_network))
        .route("/api/networks/{id}", get(networks::get_network).delete(networks::delete_network))
        .route("/api/networks/{id}/structure", get(networks::get_structure))
        .route("/api/networks/{id}/main-switch", post(networks::switch_main))
        .route("/api/networks/{id}/nodes", post(nodes::create_node))
        .route("/api/nodes/{id}", put(nodes::update_node).delete(nodes::delete_node))
        // Conflicts
        .route("/api/networks/{id}/conflicts/detect", post(conflicts::detect))
        .route("/api/conflicts", get(conflicts::list))
        .route("/api/conflicts/metrics", get(conflicts::metrics))
        .route("/api/conflicts/{id}/approve", post(conflicts::approve))
        // Optimizations
        .route("/api/optimizations", post(optimizations::create).get(optimizations::list))
        .route("/api/optimizations/{id}/status", put(optimizations::update_status))
        .route("/api/optimizations/{id}/responses", post(optimizations::respond))
        .route("/api/optimizations/{id}", delete(optimizations::delete))
        // Complaints
        .route(
            "/api/optimizations/{id}/complaints",
            post(complaints::create_for_optimization),
        )
        .route("/api/networks/{id}/complaints", post(complaints::create_for_network))
        .route("/api/complaints/{id}/resolve", put(complaints::resolve))
        // Monitoring
        .route("/api/monitoring/unmonitored-in-seo", get(monitoring::unmonitored_in_seo))
        .route("/api/monitoring/seo-domains-summary", get(monitoring::seo_domains_summary))
        .route(
            "/api/monitoring/send-unmonitored-reminders",
            post(monitoring::send_unmonitored_reminders),
        )
        .route("/api/monitoring/domain-down/test", post(monitoring::test_alert))
        .route("/api/monitoring/test-alerts/history", get(monitoring::test_alert_history))
        // Domains
        .route("/api/domains", post(domains::create).get(domains::list))
        .route("/api/domains/{id}", delete(domains::remove))
        .route("/api/domains/{id}/monitoring", put(domains::set_monitoring))
        // Templates & notifications
        .route("/api/templates", get(templates::list))
        .route("/api/templates/{channel}/{event}", put(templates::update))
        .route("/api/templates/{channel}/{event}/reset", post(templates::reset))
        .route("/api/templates/preview", post(templates::preview))
        .route("/api/notifications/test", post(templates::send_test))
        // Change ledger
        .route("/api/changes", get(changes::list))
        .route("/api/changes/{id}/retry-notification", post(changes::retry_notification))
        // Audit log
        .route("/api/audit", get(audit::query))
        .route("/api/audit/stats", get(audit::stats))
        // Settings
        .route("/api/settings/{key}", get(settings::get_settings).put(settings::put_settings))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(core)
}
