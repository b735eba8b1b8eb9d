use std::collections::{HashMap, HashSet};

use seonoc_common::paths::node_label;
use seonoc_common::types::{DomainRole, Severity, StructureEntry};

use crate::tiers::{compute_tiers, TierMap};

/// One hop of the walk from a node toward its money site.
#[derive(Debug, Clone)]
pub struct UpstreamHop {
    pub node_label: String,
    pub status_label: String,
    pub target_label: Option<String>,
    pub target_status_label: Option<String>,
    pub is_end: bool,
    /// Terminal reason: "MONEY SITE", "ORPHAN NODE" or "CIRCULAR REFERENCE".
    pub end_reason: Option<String>,
}

/// One structure entry referencing the probed domain.
#[derive(Debug, Clone)]
pub struct NodeRef {
    pub entry_id: String,
    pub network_id: String,
    pub label: String,
    pub is_main: bool,
    pub tier: Option<u32>,
    pub upstream: Vec<UpstreamHop>,
    pub reaches_money_site: bool,
    pub downstream_count: usize,
    pub direct_children: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ImpactScore {
    pub reaches_money_site: bool,
    pub downstream_nodes_count: usize,
    pub networks_affected: usize,
    /// Minimum tier number among references; lower is more important.
    pub highest_tier_impacted: Option<u32>,
    pub node_role_main: bool,
}

/// SEO usage of one domain across every network, with the strict severity.
#[derive(Debug, Clone)]
pub struct SeoContext {
    pub used_in_seo: bool,
    pub references: Vec<NodeRef>,
    pub impact: ImpactScore,
    pub severity: Severity,
    pub network_ids: Vec<String>,
}

/// Walk `target_entry_id` toward the main. Ends at the money site, at an
/// orphan endpoint, or on cycle detection.
pub fn upstream_chain(
    start: &StructureEntry,
    by_id: &HashMap<&str, &StructureEntry>,
    domains: &HashMap<String, String>,
) -> Vec<UpstreamHop> {
    let mut hops = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = start;

    loop {
        let domain_name = domains
            .get(&current.asset_domain_id)
            .map(String::as_str)
            .unwrap_or("unknown");
        let label = node_label(domain_name, current.optimized_path.as_deref());
        let status_label = if current.domain_role == DomainRole::Main {
            "Primary".to_string()
        } else {
            current.domain_status.label().to_string()
        };

        if !visited.insert(current.id.as_str()) {
            hops.push(UpstreamHop {
                node_label: label,
                status_label,
                target_label: None,
                target_status_label: None,
                is_end: true,
                end_reason: Some("CIRCULAR REFERENCE".to_string()),
            });
            break;
        }

        if current.domain_role == DomainRole::Main {
            hops.push(UpstreamHop {
                node_label: label,
                status_label,
                target_label: None,
                target_status_label: None,
                is_end: true,
                end_reason: Some("MONEY SITE".to_string()),
            });
            break;
        }

        let target = current
            .target_entry_id
            .as_deref()
            .and_then(|id| by_id.get(id).copied());
        match target {
            Some(next) => {
                let target_domain = domains
                    .get(&next.asset_domain_id)
                    .map(String::as_str)
                    .unwrap_or("unknown");
                hops.push(UpstreamHop {
                    node_label: label,
                    status_label,
                    target_label: Some(node_label(target_domain, next.optimized_path.as_deref())),
                    target_status_label: Some(if next.domain_role == DomainRole::Main {
                        "Primary".to_string()
                    } else {
                        next.domain_status.label().to_string()
                    }),
                    is_end: false,
                    end_reason: None,
                });
                current = next;
            }
            None => {
                hops.push(UpstreamHop {
                    node_label: label,
                    status_label,
                    target_label: None,
                    target_status_label: None,
                    is_end: true,
                    end_reason: Some("ORPHAN NODE".to_string()),
                });
                break;
            }
        }
    }
    hops
}

/// All nodes whose transitive target chain resolves to `entry_id`, plus the
/// direct-children subset. Cycle-safe.
pub fn downstream_impact(entry_id: &str, entries: &[StructureEntry]) -> (Vec<String>, Vec<String>) {
    let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
    for entry in entries {
        if let Some(target) = entry.target_entry_id.as_deref() {
            reverse.entry(target).or_default().push(entry.id.as_str());
        }
    }

    let direct: Vec<String> = reverse
        .get(entry_id)
        .map(|v| v.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    let mut transitive = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = reverse.get(entry_id).cloned().unwrap_or_default();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        transitive.push(id.to_string());
        if let Some(children) = reverse.get(id) {
            stack.extend(children.iter().copied());
        }
    }
    (transitive, direct)
}

/// Strict severity over the aggregated impact:
/// main → CRITICAL; tier 1 reaching the money site → CRITICAL;
/// tier 1 or ≥3 downstream nodes → HIGH; tier ≥2 reaching the money site →
/// MEDIUM; orphan or unused → LOW.
pub fn strict_severity(impact: &ImpactScore) -> Severity {
    if impact.node_role_main {
        return Severity::Critical;
    }
    match impact.highest_tier_impacted {
        Some(1) if impact.reaches_money_site => Severity::Critical,
        Some(1) => Severity::High,
        _ if impact.downstream_nodes_count >= 3 => Severity::High,
        Some(t) if t >= 2 && impact.reaches_money_site => Severity::Medium,
        Some(0) => Severity::Critical,
        _ => Severity::Low,
    }
}

/// Compute the full SEO context for one domain across every network that
/// references it. `all_entries` spans networks; tiers are computed per
/// network.
pub fn enrich_domain(
    domain_id: &str,
    all_entries: &[StructureEntry],
    domains: &HashMap<String, String>,
) -> SeoContext {
    let mut by_network: HashMap<&str, Vec<&StructureEntry>> = HashMap::new();
    for entry in all_entries {
        by_network
            .entry(entry.network_id.as_str())
            .or_default()
            .push(entry);
    }

    let mut references = Vec::new();
    let mut network_ids = Vec::new();

    for (network_id, network_entries) in &by_network {
        if !network_entries.iter().any(|e| e.asset_domain_id == domain_id) {
            continue;
        }
        network_ids.push(network_id.to_string());

        let owned: Vec<StructureEntry> = network_entries.iter().map(|e| (*e).clone()).collect();
        let tiers: TierMap = compute_tiers(&owned);
        let by_id: HashMap<&str, &StructureEntry> =
            owned.iter().map(|e| (e.id.as_str(), e)).collect();

        for entry in owned.iter().filter(|e| e.asset_domain_id == domain_id) {
            let upstream = upstream_chain(entry, &by_id, domains);
            let reaches = upstream
                .last()
                .and_then(|h| h.end_reason.as_deref())
                .map(|r| r == "MONEY SITE")
                .unwrap_or(false);
            let (transitive, direct) = downstream_impact(&entry.id, &owned);
            let domain_name = domains
                .get(&entry.asset_domain_id)
                .map(String::as_str)
                .unwrap_or("unknown");
            references.push(NodeRef {
                entry_id: entry.id.clone(),
                network_id: network_id.to_string(),
                label: node_label(domain_name, entry.optimized_path.as_deref()),
                is_main: entry.domain_role == DomainRole::Main,
                tier: tiers.tier(&entry.id),
                upstream,
                reaches_money_site: reaches,
                downstream_count: transitive.len(),
                direct_children: direct.len(),
            });
        }
    }

    network_ids.sort();
    references.sort_by(|a, b| {
        a.tier
            .unwrap_or(u32::MAX)
            .cmp(&b.tier.unwrap_or(u32::MAX))
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });

    let impact = ImpactScore {
        reaches_money_site: references.iter().any(|r| r.reaches_money_site),
        downstream_nodes_count: references.iter().map(|r| r.downstream_count).sum(),
        networks_affected: network_ids.len(),
        highest_tier_impacted: references.iter().filter_map(|r| r.tier).min(),
        node_role_main: references.iter().any(|r| r.is_main),
    };
    let severity = if references.is_empty() {
        Severity::Low
    } else {
        strict_severity(&impact)
    };

    SeoContext {
        used_in_seo: !references.is_empty(),
        references,
        impact,
        severity,
        network_ids,
    }
}

impl SeoContext {
    /// "a [Canonical] → b [Primary]" for the most important reference.
    pub fn upstream_chain_text(&self) -> String {
        let Some(reference) = self.references.first() else {
            return "(not in any SEO network)".to_string();
        };
        let mut parts = Vec::new();
        for hop in &reference.upstream {
            parts.push(format!("{} [{}]", hop.node_label, hop.status_label));
            if let Some(reason) = hop.end_reason.as_deref() {
                if reason != "MONEY SITE" {
                    parts.push(format!("⚠️ {reason}"));
                }
            }
        }
        parts.join(" → ")
    }

    pub fn downstream_text(&self) -> String {
        format!("{} nodes", self.impact.downstream_nodes_count)
    }
}

/// Structure snapshot helper for a probed domain's first network.
pub fn network_snapshot_for(
    network_id: &str,
    all_entries: &[StructureEntry],
    domains: &HashMap<String, String>,
) -> String {
    let owned: Vec<StructureEntry> = all_entries
        .iter()
        .filter(|e| e.network_id == network_id)
        .cloned()
        .collect();
    let tiers = compute_tiers(&owned);
    crate::snapshot::structure_snapshot(&owned, domains, &tiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entry, main_entry, with_path};

    fn domains() -> HashMap<String, String> {
        [
            ("d-money".to_string(), "money.com".to_string()),
            ("d-support".to_string(), "support.com".to_string()),
            ("d-extra".to_string(), "extra.com".to_string()),
            ("d-deep".to_string(), "deep.com".to_string()),
        ]
        .into()
    }

    fn wired_network() -> Vec<StructureEntry> {
        vec![
            main_entry("m", "net", "d-money"),
            with_path(entry("t1", "net", "d-support", Some("m")), "/blog"),
            entry("t2", "net", "d-extra", Some("t1")),
            entry("t3", "net", "d-deep", Some("t2")),
        ]
    }

    #[test]
    fn main_domain_is_critical() {
        let ctx = enrich_domain("d-money", &wired_network(), &domains());
        assert!(ctx.used_in_seo);
        assert!(ctx.impact.node_role_main);
        assert_eq!(ctx.severity, Severity::Critical);
        assert_eq!(ctx.impact.highest_tier_impacted, Some(0));
    }

    #[test]
    fn tier1_reaching_money_site_is_critical() {
        let ctx = enrich_domain("d-support", &wired_network(), &domains());
        assert_eq!(ctx.impact.highest_tier_impacted, Some(1));
        assert!(ctx.impact.reaches_money_site);
        assert_eq!(ctx.severity, Severity::Critical);
    }

    #[test]
    fn tier2_reaching_money_site_is_medium() {
        let ctx = enrich_domain("d-extra", &wired_network(), &domains());
        assert_eq!(ctx.impact.highest_tier_impacted, Some(2));
        assert_eq!(ctx.severity, Severity::Medium);
    }

    #[test]
    fn unused_domain_is_low() {
        let ctx = enrich_domain("d-unknown", &wired_network(), &domains());
        assert!(!ctx.used_in_seo);
        assert_eq!(ctx.severity, Severity::Low);
    }

    #[test]
    fn orphan_is_low() {
        let entries = vec![
            main_entry("m", "net", "d-money"),
            entry("loose", "net", "d-extra", None),
        ];
        let ctx = enrich_domain("d-extra", &entries, &domains());
        assert!(ctx.used_in_seo);
        assert_eq!(ctx.impact.highest_tier_impacted, None);
        assert_eq!(ctx.severity, Severity::Low);
    }

    #[test]
    fn three_downstream_nodes_elevate_to_high() {
        // extra has three nodes behind it but sits at tier 1... tier 1
        // already gives HIGH/CRITICAL; park it as an orphan head instead.
        let entries = vec![
            main_entry("m", "net", "d-money"),
            entry("head", "net", "d-extra", None),
            entry("c1", "net", "d-support", Some("head")),
            entry("c2", "net", "d-deep", Some("c1")),
            with_path(entry("c3", "net", "d-deep", Some("c2")), "/x"),
        ];
        let ctx = enrich_domain("d-extra", &entries, &domains());
        assert_eq!(ctx.impact.downstream_nodes_count, 3);
        assert!(!ctx.impact.reaches_money_site);
        assert_eq!(ctx.severity, Severity::High);
    }

    #[test]
    fn upstream_chain_ends_at_money_site() {
        let ctx = enrich_domain("d-extra", &wired_network(), &domains());
        let reference = &ctx.references[0];
        let last = reference.upstream.last().unwrap();
        assert!(last.is_end);
        assert_eq!(last.end_reason.as_deref(), Some("MONEY SITE"));
        assert_eq!(
            ctx.upstream_chain_text(),
            "extra.com [Canonical] → support.com/blog [Canonical] → money.com [Primary]"
        );
    }

    #[test]
    fn upstream_chain_marks_orphan_endpoint() {
        let entries = vec![
            main_entry("m", "net", "d-money"),
            entry("loose", "net", "d-extra", None),
        ];
        let ctx = enrich_domain("d-extra", &entries, &domains());
        let last = ctx.references[0].upstream.last().unwrap();
        assert_eq!(last.end_reason.as_deref(), Some("ORPHAN NODE"));
    }

    #[test]
    fn upstream_chain_detects_cycles() {
        let entries = vec![
            entry("a", "net", "d-support", Some("b")),
            entry("b", "net", "d-extra", Some("a")),
        ];
        let ctx = enrich_domain("d-support", &entries, &domains());
        let last = ctx.references[0].upstream.last().unwrap();
        assert_eq!(last.end_reason.as_deref(), Some("CIRCULAR REFERENCE"));
    }

    #[test]
    fn downstream_counts_transitive_and_direct() {
        let entries = wired_network();
        let (transitive, direct) = downstream_impact("t1", &entries);
        assert_eq!(transitive.len(), 2);
        assert_eq!(direct.len(), 1);
        let (transitive_m, direct_m) = downstream_impact("m", &entries);
        assert_eq!(transitive_m.len(), 3);
        assert_eq!(direct_m.len(), 1);
    }

    #[test]
    fn networks_affected_counts_distinct_networks() {
        let mut entries = wired_network();
        entries.push(main_entry("m2", "net2", "d-deep"));
        entries.push(entry("x", "net2", "d-support", Some("m2")));
        let ctx = enrich_domain("d-support", &entries, &domains());
        assert_eq!(ctx.impact.networks_affected, 2);
    }
}
