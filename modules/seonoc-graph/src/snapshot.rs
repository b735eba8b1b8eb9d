use std::collections::HashMap;

use seonoc_common::paths::node_label;
use seonoc_common::types::{DomainRole, StructureEntry};

use crate::tiers::{tier_label, TierMap};

/// "domain.com/path [Status]". Main nodes always show Primary.
pub fn format_node_with_status(
    domain_name: &str,
    path: Option<&str>,
    entry: &StructureEntry,
) -> String {
    let label = node_label(domain_name, path);
    let status = if entry.domain_role == DomainRole::Main {
        "Primary"
    } else {
        entry.domain_status.label()
    };
    format!("{label} [{status}]")
}

/// Full authority chain from a node to its final destination:
/// "node [Status] → node [Status] → main [Primary]". Cycle-guarded.
pub fn authority_chain(
    start: &StructureEntry,
    by_id: &HashMap<&str, &StructureEntry>,
    domains: &HashMap<String, String>,
) -> String {
    let mut parts = Vec::new();
    let mut visited: Vec<&str> = Vec::new();
    let mut current = start;

    loop {
        if visited.contains(&current.id.as_str()) {
            parts.push("⚠️ Circular Reference".to_string());
            break;
        }
        visited.push(current.id.as_str());

        let domain_name = domains
            .get(&current.asset_domain_id)
            .map(String::as_str)
            .unwrap_or("unknown");
        parts.push(format_node_with_status(
            domain_name,
            current.optimized_path.as_deref(),
            current,
        ));

        if current.domain_role == DomainRole::Main {
            break;
        }
        let Some(target_id) = current.target_entry_id.as_deref() else {
            break;
        };
        match by_id.get(target_id) {
            Some(target) => current = target,
            None => break,
        }
    }

    parts.join(" → ")
}

/// Serialize a network for notification bodies: nodes grouped by tier,
/// main-first then alphabetical within a group, each line carrying the full
/// authority chain.
pub fn structure_snapshot(
    entries: &[StructureEntry],
    domains: &HashMap<String, String>,
    tiers: &TierMap,
) -> String {
    if entries.is_empty() {
        return "No nodes in this network.".to_string();
    }

    let by_id: HashMap<&str, &StructureEntry> =
        entries.iter().map(|e| (e.id.as_str(), e)).collect();

    // tier → (sort key, chain)
    let mut groups: HashMap<Option<u32>, Vec<(u8, String, String)>> = HashMap::new();
    for entry in entries {
        let tier = tiers.tier(&entry.id);
        let chain = authority_chain(entry, &by_id, domains);
        let domain_name = domains
            .get(&entry.asset_domain_id)
            .cloned()
            .unwrap_or_default();
        let main_first = if entry.domain_role == DomainRole::Main { 0 } else { 1 };
        groups
            .entry(tier)
            .or_default()
            .push((main_first, domain_name, chain));
    }

    let mut ordered_tiers: Vec<Option<u32>> = groups.keys().copied().collect();
    // Ranked tiers ascending, orphans last.
    ordered_tiers.sort_by_key(|t| match t {
        Some(n) => (0, *n),
        None => (1, 0),
    });

    let mut lines = Vec::new();
    for tier in ordered_tiers {
        let mut nodes = groups.remove(&tier).unwrap_or_default();
        nodes.sort();
        lines.push(format!("<b>{}:</b>", tier_label(tier)));
        for (_, _, chain) in nodes {
            lines.push(format!("  • {chain}"));
        }
        lines.push(String::new());
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entry, main_entry, with_path, with_status};
    use crate::tiers::compute_tiers;
    use seonoc_common::types::NodeStatus;

    fn domains() -> HashMap<String, String> {
        [
            ("d-money".to_string(), "money.com".to_string()),
            ("d-support".to_string(), "support.com".to_string()),
            ("d-extra".to_string(), "extra.com".to_string()),
        ]
        .into()
    }

    #[test]
    fn chain_renders_status_per_hop() {
        let entries = vec![
            main_entry("m", "net", "d-money"),
            with_path(entry("s", "net", "d-support", Some("m")), "/blog"),
        ];
        let by_id: HashMap<&str, &StructureEntry> =
            entries.iter().map(|e| (e.id.as_str(), e)).collect();
        let chain = authority_chain(&entries[1], &by_id, &domains());
        assert_eq!(chain, "support.com/blog [Canonical] → money.com [Primary]");
    }

    #[test]
    fn chain_marks_cycles() {
        let entries = vec![
            with_status(entry("a", "net", "d-support", Some("b")), NodeStatus::Redirect301),
            with_status(entry("b", "net", "d-extra", Some("a")), NodeStatus::Redirect301),
        ];
        let by_id: HashMap<&str, &StructureEntry> =
            entries.iter().map(|e| (e.id.as_str(), e)).collect();
        let chain = authority_chain(&entries[0], &by_id, &domains());
        assert!(chain.ends_with("⚠️ Circular Reference"), "got {chain}");
    }

    #[test]
    fn snapshot_groups_by_tier_with_orphans_last() {
        let entries = vec![
            main_entry("m", "net", "d-money"),
            entry("s", "net", "d-support", Some("m")),
            entry("o", "net", "d-extra", None),
        ];
        let tiers = compute_tiers(&entries);
        let snapshot = structure_snapshot(&entries, &domains(), &tiers);

        let lp = snapshot.find("LP / Money Site").unwrap();
        let t1 = snapshot.find("Tier 1").unwrap();
        let orphan = snapshot.find("Orphan (Unlinked)").unwrap();
        assert!(lp < t1 && t1 < orphan, "tier order wrong:\n{snapshot}");
        assert!(snapshot.contains("  • support.com [Canonical] → money.com [Primary]"));
    }

    #[test]
    fn empty_network_has_placeholder() {
        let tiers = compute_tiers(&[]);
        assert_eq!(
            structure_snapshot(&[], &domains(), &tiers),
            "No nodes in this network."
        );
    }

    #[test]
    fn main_sorts_before_supporters_in_same_group() {
        // Two tier-0-adjacent nodes can't share a group, so check tier 1:
        // alphabetical by domain.
        let entries = vec![
            main_entry("m", "net", "d-money"),
            entry("s2", "net", "d-support", Some("m")),
            entry("s1", "net", "d-extra", Some("m")),
        ];
        let tiers = compute_tiers(&entries);
        let snapshot = structure_snapshot(&entries, &domains(), &tiers);
        let extra = snapshot.find("extra.com").unwrap();
        let support = snapshot.find("support.com [Canonical]").unwrap();
        assert!(extra < support, "alphabetical order wrong:\n{snapshot}");
    }
}
