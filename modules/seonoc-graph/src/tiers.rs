use std::collections::{HashMap, VecDeque};

use seonoc_common::types::{DomainRole, StructureEntry};

/// Computed tiers for one network. Tier 0 is the main; tier k is the
/// shortest hop count to a main following `target_entry_id` edges. Nodes
/// unreachable from any main are orphans. Recomputed on demand, never
/// stored.
#[derive(Debug, Clone)]
pub struct TierMap {
    tiers: HashMap<String, u32>,
    orphans: Vec<String>,
}

impl TierMap {
    /// Tier of a node; `None` means orphan (or unknown id).
    pub fn tier(&self, entry_id: &str) -> Option<u32> {
        self.tiers.get(entry_id).copied()
    }

    pub fn is_orphan(&self, entry_id: &str) -> bool {
        !self.tiers.contains_key(entry_id)
    }

    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Display form: "0", "1", ... "5+" for deep nodes, "orphan" otherwise.
    pub fn display(&self, entry_id: &str) -> String {
        match self.tier(entry_id) {
            Some(t) if t >= 5 => "5+".to_string(),
            Some(t) => t.to_string(),
            None => "orphan".to_string(),
        }
    }
}

/// BFS from all main nodes following the reverse of `target_entry_id`
/// edges (from a target back to its sources). Ties broken by first visit;
/// source order is the input order, so results are deterministic.
pub fn compute_tiers(entries: &[StructureEntry]) -> TierMap {
    // target id → entries pointing at it, in input order.
    let mut reverse: HashMap<&str, Vec<&StructureEntry>> = HashMap::new();
    for entry in entries {
        if let Some(target) = entry.target_entry_id.as_deref() {
            reverse.entry(target).or_default().push(entry);
        }
    }

    let mut tiers: HashMap<String, u32> = HashMap::new();
    let mut queue: VecDeque<(&str, u32)> = entries
        .iter()
        .filter(|e| e.domain_role == DomainRole::Main)
        .map(|e| (e.id.as_str(), 0))
        .collect();

    while let Some((id, tier)) = queue.pop_front() {
        if tiers.contains_key(id) {
            continue;
        }
        tiers.insert(id.to_string(), tier);
        if let Some(sources) = reverse.get(id) {
            for source in sources {
                if !tiers.contains_key(source.id.as_str()) {
                    queue.push_back((source.id.as_str(), tier + 1));
                }
            }
        }
    }

    let orphans = entries
        .iter()
        .filter(|e| !tiers.contains_key(e.id.as_str()))
        .map(|e| e.id.clone())
        .collect();

    TierMap { tiers, orphans }
}

/// Group label used in structure snapshots and digests.
pub fn tier_label(tier: Option<u32>) -> &'static str {
    match tier {
        Some(0) => "LP / Money Site",
        Some(1) => "Tier 1",
        Some(2) => "Tier 2",
        Some(3) => "Tier 3",
        Some(4) => "Tier 4",
        Some(_) => "Tier 5+",
        None => "Orphan (Unlinked)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entry, main_entry};

    #[test]
    fn main_is_tier_zero() {
        let entries = vec![main_entry("m", "net", "d-money")];
        let tiers = compute_tiers(&entries);
        assert_eq!(tiers.tier("m"), Some(0));
        assert!(!tiers.is_orphan("m"));
    }

    #[test]
    fn supporters_get_hop_distance() {
        let entries = vec![
            main_entry("m", "net", "d0"),
            entry("t1", "net", "d1", Some("m")),
            entry("t2", "net", "d2", Some("t1")),
            entry("t3", "net", "d3", Some("t2")),
        ];
        let tiers = compute_tiers(&entries);
        assert_eq!(tiers.tier("t1"), Some(1));
        assert_eq!(tiers.tier("t2"), Some(2));
        assert_eq!(tiers.tier("t3"), Some(3));
    }

    #[test]
    fn shortest_path_wins_on_diamonds() {
        // d targets both the main directly and a tier-2 chain; BFS must
        // assign the short hop.
        let entries = vec![
            main_entry("m", "net", "d0"),
            entry("a", "net", "d1", Some("m")),
            entry("b", "net", "d2", Some("a")),
            entry("d", "net", "d3", Some("m")),
        ];
        let tiers = compute_tiers(&entries);
        assert_eq!(tiers.tier("d"), Some(1));
        assert_eq!(tiers.tier("b"), Some(2));
    }

    #[test]
    fn unreachable_nodes_are_orphans() {
        let entries = vec![
            main_entry("m", "net", "d0"),
            entry("loose", "net", "d1", None),
            entry("dangling", "net", "d2", Some("missing-id")),
        ];
        let tiers = compute_tiers(&entries);
        assert!(tiers.is_orphan("loose"));
        assert!(tiers.is_orphan("dangling"));
        assert_eq!(tiers.orphans().len(), 2);
        assert_eq!(tiers.display("loose"), "orphan");
    }

    #[test]
    fn deep_chains_display_five_plus() {
        let mut entries = vec![main_entry("m", "net", "d0")];
        let mut prev = "m".to_string();
        for i in 1..=6 {
            let id = format!("n{i}");
            entries.push(entry(&id, "net", &format!("d{i}"), Some(&prev)));
            prev = id;
        }
        let tiers = compute_tiers(&entries);
        assert_eq!(tiers.display("n5"), "5+");
        assert_eq!(tiers.display("n6"), "5+");
        assert_eq!(tiers.display("n4"), "4");
    }

    #[test]
    fn cycles_without_main_are_orphans() {
        let entries = vec![
            entry("a", "net", "d1", Some("b")),
            entry("b", "net", "d2", Some("a")),
        ];
        let tiers = compute_tiers(&entries);
        assert!(tiers.is_orphan("a"));
        assert!(tiers.is_orphan("b"));
    }

    #[test]
    fn recomputation_is_stable() {
        let entries = vec![
            main_entry("m", "net", "d0"),
            entry("a", "net", "d1", Some("m")),
            entry("b", "net", "d2", Some("a")),
        ];
        let first = compute_tiers(&entries);
        let second = compute_tiers(&entries);
        for e in &entries {
            assert_eq!(first.tier(&e.id), second.tier(&e.id));
        }
    }
}
