use seonoc_common::error::{NocError, NocResult};
use seonoc_common::types::{AssetDomain, DomainRole, NodeStatus, SeoNetwork, StructureEntry};

/// Structural invariants enforced on every write. `existing` is the full
/// node set of the network; for updates it still contains the old version
/// of the candidate (matched by id and skipped).
pub fn validate_entry_write(
    existing: &[StructureEntry],
    candidate: &StructureEntry,
    network: &SeoNetwork,
    domain: &AssetDomain,
) -> NocResult<()> {
    if candidate.network_id != network.id {
        return Err(NocError::validation("entry does not belong to this network"));
    }
    if domain.id != candidate.asset_domain_id {
        return Err(NocError::validation("domain does not match the entry"));
    }
    // Cross-brand guard: a node's domain must share the network's brand.
    if domain.brand_id != network.brand_id {
        return Err(NocError::Conflict(format!(
            "domain {} belongs to a different brand than network {}",
            domain.domain_name, network.name
        )));
    }

    let others: Vec<&StructureEntry> = existing
        .iter()
        .filter(|e| e.id != candidate.id)
        .collect();

    // Exactly one main per network.
    if candidate.domain_role == DomainRole::Main {
        if let Some(other_main) = others.iter().find(|e| e.domain_role == DomainRole::Main) {
            return Err(NocError::Conflict(format!(
                "network already has a main node ({})",
                other_main.id
            )));
        }
        if candidate.target_entry_id.is_some() {
            return Err(NocError::validation("main node cannot have a target"));
        }
        if candidate.domain_status != NodeStatus::Primary {
            return Err(NocError::validation("main node must have primary status"));
        }
    }

    if let Some(target_id) = candidate.target_entry_id.as_deref() {
        if target_id == candidate.id {
            return Err(NocError::validation("a node cannot target itself"));
        }
        let target_exists = others.iter().any(|e| e.id == target_id);
        if !target_exists {
            return Err(NocError::validation(
                "target node does not exist in this network",
            ));
        }
    }

    // Normalized-path uniqueness per (network, domain).
    let duplicate = others.iter().any(|e| {
        e.asset_domain_id == candidate.asset_domain_id
            && e.optimized_path == candidate.optimized_path
    });
    if duplicate {
        return Err(NocError::Conflict(format!(
            "a node for this domain and path already exists in network {}",
            network.name
        )));
    }

    Ok(())
}

/// The main node cannot be deleted while other nodes remain.
pub fn validate_entry_delete(existing: &[StructureEntry], entry: &StructureEntry) -> NocResult<()> {
    if entry.domain_role == DomainRole::Main {
        let others = existing.iter().filter(|e| e.id != entry.id).count();
        if others > 0 {
            return Err(NocError::Conflict(format!(
                "cannot delete the main node while {others} other nodes exist in the network"
            )));
        }
    }
    Ok(())
}

/// Post-condition check for a whole network; used by tests and the
/// consistency endpoint.
pub fn validate_network(entries: &[StructureEntry]) -> NocResult<()> {
    let mains: Vec<&StructureEntry> = entries
        .iter()
        .filter(|e| e.domain_role == DomainRole::Main)
        .collect();
    if entries.is_empty() {
        return Ok(());
    }
    if mains.len() != 1 {
        return Err(NocError::Conflict(format!(
            "network must have exactly one main node, found {}",
            mains.len()
        )));
    }
    let main = mains[0];
    if main.target_entry_id.is_some() || main.domain_status != NodeStatus::Primary {
        return Err(NocError::Conflict(
            "main node must have no target and primary status".to_string(),
        ));
    }
    for entry in entries {
        if let Some(target) = entry.target_entry_id.as_deref() {
            if target == entry.id {
                return Err(NocError::Conflict(format!("node {} targets itself", entry.id)));
            }
            if !entries.iter().any(|e| e.id == target) {
                return Err(NocError::Conflict(format!(
                    "node {} targets {} which is not in the network",
                    entry.id, target
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entry, main_entry, with_path};
    use chrono::Utc;
    use seonoc_common::types::{
        DomainStatus, LifecycleStatus, MonitoringInterval, PingStatus, VisibilityMode,
    };

    fn network(id: &str, brand: &str) -> SeoNetwork {
        SeoNetwork {
            id: id.to_string(),
            brand_id: brand.to_string(),
            name: "Net-1".to_string(),
            status: "active".to_string(),
            visibility_mode: VisibilityMode::BrandBased,
            manager_ids: vec![],
            created_by: "u1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn domain(id: &str, brand: &str) -> AssetDomain {
        AssetDomain {
            id: id.to_string(),
            domain_name: format!("{id}.com"),
            brand_id: brand.to_string(),
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

    #[test]
    fn second_main_is_rejected() {
        let net = network("net", "b1");
        let existing = vec![main_entry("m", "net", "d0")];
        let candidate = main_entry("m2", "net", "d1");
        let err = validate_entry_write(&existing, &candidate, &net, &domain("d1", "b1"))
            .unwrap_err();
        assert!(matches!(err, NocError::Conflict(_)));
    }

    #[test]
    fn main_with_target_is_rejected() {
        let net = network("net", "b1");
        let mut candidate = main_entry("m", "net", "d0");
        candidate.target_entry_id = Some("x".to_string());
        let err =
            validate_entry_write(&[], &candidate, &net, &domain("d0", "b1")).unwrap_err();
        assert!(matches!(err, NocError::Validation(_)));
    }

    #[test]
    fn cross_brand_domain_is_rejected() {
        let net = network("net", "b1");
        let candidate = main_entry("m", "net", "d0");
        let err =
            validate_entry_write(&[], &candidate, &net, &domain("d0", "b2")).unwrap_err();
        assert!(matches!(err, NocError::Conflict(_)));
    }

    #[test]
    fn self_reference_is_rejected() {
        let net = network("net", "b1");
        let existing = vec![main_entry("m", "net", "d0")];
        let mut candidate = entry("s", "net", "d1", Some("s"));
        candidate.network_id = "net".to_string();
        let err = validate_entry_write(&existing, &candidate, &net, &domain("d1", "b1"))
            .unwrap_err();
        assert!(matches!(err, NocError::Validation(_)));
    }

    #[test]
    fn missing_target_is_rejected() {
        let net = network("net", "b1");
        let existing = vec![main_entry("m", "net", "d0")];
        let candidate = entry("s", "net", "d1", Some("elsewhere"));
        let err = validate_entry_write(&existing, &candidate, &net, &domain("d1", "b1"))
            .unwrap_err();
        assert!(matches!(err, NocError::Validation(_)));
    }

    #[test]
    fn duplicate_placement_is_rejected() {
        let net = network("net", "b1");
        let existing = vec![
            main_entry("m", "net", "d0"),
            with_path(entry("s", "net", "d1", Some("m")), "/blog"),
        ];
        let candidate = with_path(entry("s2", "net", "d1", Some("m")), "/blog");
        let err = validate_entry_write(&existing, &candidate, &net, &domain("d1", "b1"))
            .unwrap_err();
        assert!(matches!(err, NocError::Conflict(_)));
    }

    #[test]
    fn same_domain_different_path_is_fine() {
        let net = network("net", "b1");
        let existing = vec![
            main_entry("m", "net", "d0"),
            with_path(entry("s", "net", "d1", Some("m")), "/blog"),
        ];
        let candidate = with_path(entry("s2", "net", "d1", Some("m")), "/blog2");
        validate_entry_write(&existing, &candidate, &net, &domain("d1", "b1")).unwrap();
    }

    #[test]
    fn update_does_not_collide_with_itself() {
        let net = network("net", "b1");
        let existing = vec![
            main_entry("m", "net", "d0"),
            with_path(entry("s", "net", "d1", Some("m")), "/blog"),
        ];
        // Same id, same placement: the old version must be skipped.
        let candidate = with_path(entry("s", "net", "d1", Some("m")), "/blog");
        validate_entry_write(&existing, &candidate, &net, &domain("d1", "b1")).unwrap();
    }

    #[test]
    fn main_delete_blocked_with_children() {
        let existing = vec![
            main_entry("m", "net", "d0"),
            entry("s", "net", "d1", Some("m")),
        ];
        let err = validate_entry_delete(&existing, &existing[0]).unwrap_err();
        assert!(matches!(err, NocError::Conflict(_)));
        // Lone main deletes fine.
        let lone = vec![main_entry("m", "net", "d0")];
        validate_entry_delete(&lone, &lone[0]).unwrap();
    }

    #[test]
    fn network_validation_accepts_wired_network() {
        let entries = vec![
            main_entry("m", "net", "d0"),
            entry("s", "net", "d1", Some("m")),
        ];
        validate_network(&entries).unwrap();
    }
}
