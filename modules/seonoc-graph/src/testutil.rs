//! Builders for structure entries used across the graph test suites.

use chrono::Utc;

use seonoc_common::types::{DomainRole, IndexStatus, NodeStatus, StructureEntry};

/// A supporting node with canonical status targeting `target`.
pub fn entry(id: &str, network_id: &str, domain_id: &str, target: Option<&str>) -> StructureEntry {
    StructureEntry {
        id: id.to_string(),
        network_id: network_id.to_string(),
        asset_domain_id: domain_id.to_string(),
        optimized_path: None,
        domain_role: DomainRole::Supporting,
        domain_status: NodeStatus::Canonical,
        index_status: IndexStatus::Index,
        target_entry_id: target.map(|t| t.to_string()),
        ranking_position: None,
        primary_keyword: String::new(),
        ranking_url: String::new(),
        notes: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// The network's main node.
pub fn main_entry(id: &str, network_id: &str, domain_id: &str) -> StructureEntry {
    StructureEntry {
        domain_role: DomainRole::Main,
        domain_status: NodeStatus::Primary,
        ..entry(id, network_id, domain_id, None)
    }
}

pub fn with_path(mut e: StructureEntry, path: &str) -> StructureEntry {
    e.optimized_path = Some(path.to_string());
    e
}

pub fn with_status(mut e: StructureEntry, status: NodeStatus) -> StructureEntry {
    e.domain_status = status;
    e
}

pub fn with_keyword(mut e: StructureEntry, keyword: &str) -> StructureEntry {
    e.primary_keyword = keyword.to_string();
    e
}

pub fn noindex(mut e: StructureEntry) -> StructureEntry {
    e.index_status = IndexStatus::Noindex;
    e
}
