//! Code-built monitoring alert bodies. Down and expiration alerts render
//! through the template engine; these cover the system-generated shapes
//! that have no operator-editable template.

use seonoc_common::types::{PingStatus, Severity, SoftBlockType};
use seonoc_graph::SeoContext;

const BAR: &str = "━━━━━━━━━━━━━━━━━━━━━━";

fn seo_context_block(domain_name: &str, ctx: &SeoContext, structure: &str) -> Vec<String> {
    let mut lines = vec![
        BAR.to_string(),
        "🧭 <b>SEO NETWORK CONTEXT</b>".to_string(),
        BAR.to_string(),
    ];
    if ctx.used_in_seo {
        lines.push(format!("• Networks: {}", ctx.impact.networks_affected));
        lines.push(format!(
            "• Highest Tier: {}",
            ctx.impact
                .highest_tier_impacted
                .map(|t| t.to_string())
                .unwrap_or_else(|| "orphan".to_string())
        ));
        lines.push(format!("• Upstream Chain: {}", ctx.upstream_chain_text()));
        lines.push(format!("• Downstream Impact: {}", ctx.downstream_text()));
        if !structure.is_empty() {
            lines.extend([
                String::new(),
                BAR.to_string(),
                "🧭 <b>CURRENT SEO STRUCTURE</b>".to_string(),
                BAR.to_string(),
                structure.to_string(),
            ]);
        }
    } else {
        lines.push(format!("• {domain_name} is not used in any SEO network"));
    }
    lines
}

/// Daily nag for a domain used in SEO structures without monitoring.
pub fn unmonitored_alert(domain_name: &str, ctx: &SeoContext, structure: &str) -> String {
    let mut lines = vec![
        "⚠️ <b>MONITORING NOT ENABLED</b>".to_string(),
        String::new(),
        format!(
            "Domain <b>{domain_name}</b> is used in {} SEO network(s) but has monitoring disabled.",
            ctx.impact.networks_affected
        ),
        String::new(),
    ];
    lines.extend(seo_context_block(domain_name, ctx, structure));
    lines.extend([
        String::new(),
        BAR.to_string(),
        "🔥 <b>IMPACT SUMMARY</b>".to_string(),
        BAR.to_string(),
        format!(
            "• Severity: {} {}",
            ctx.severity.emoji(),
            ctx.severity.as_upper()
        ),
        format!("• Affected Nodes: {}", ctx.impact.downstream_nodes_count),
        String::new(),
        BAR.to_string(),
        "⏰ <b>NEXT ACTION</b>".to_string(),
        BAR.to_string(),
        "Enable monitoring for this domain. This reminder repeats daily".to_string(),
        "until monitoring is enabled or the domain leaves every network.".to_string(),
    ]);
    lines.join("\n")
}

/// Soft-block transition alert. Always WARNING, by policy.
pub fn soft_block_alert(
    domain_name: &str,
    block: SoftBlockType,
    http_code: Option<u16>,
    ctx: &SeoContext,
    structure: &str,
) -> String {
    let mut lines = vec![
        "🟡 <b>DOMAIN SOFT-BLOCKED</b> (WARNING)".to_string(),
        String::new(),
        format!("Domain <b>{domain_name}</b> responds but sits behind a wall."),
        String::new(),
        BAR.to_string(),
        "📌 <b>DETAILS</b>".to_string(),
        BAR.to_string(),
        format!("• Block Type: {}", block.as_str()),
        format!(
            "• HTTP Status: {}",
            http_code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
        ),
        String::new(),
    ];
    lines.extend(seo_context_block(domain_name, ctx, structure));
    lines.extend([
        String::new(),
        BAR.to_string(),
        "⏰ <b>NEXT ACTION</b>".to_string(),
        BAR.to_string(),
        "Verify the block manually; search engines may be walled out too.".to_string(),
    ]);
    lines.join("\n")
}

/// Recovery alert after a down or soft-blocked stretch.
pub fn recovery_alert(domain_name: &str, previous: PingStatus) -> String {
    [
        "🟢 <b>DOMAIN RECOVERED</b>".to_string(),
        String::new(),
        format!(
            "Domain <b>{domain_name}</b> is reachable again (was {}).",
            previous.as_str()
        ),
    ]
    .join("\n")
}

/// Severity-tagged header line used in admin emails.
pub fn email_subject(kind: &str, domain_name: &str, severity: Severity) -> String {
    format!("[SEO-NOC] {} {kind}: {domain_name}", severity.as_upper())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seonoc_graph::enrich_domain;
    use seonoc_graph::testutil::{entry, main_entry};
    use std::collections::HashMap;

    fn ctx() -> SeoContext {
        let entries = vec![
            main_entry("m", "net", "d-money"),
            entry("s", "net", "d-support", Some("m")),
        ];
        let domains: HashMap<String, String> = [
            ("d-money".to_string(), "money.com".to_string()),
            ("d-support".to_string(), "support.com".to_string()),
        ]
        .into();
        enrich_domain("d-support", &entries, &domains)
    }

    #[test]
    fn unmonitored_alert_has_ordered_sections() {
        let text = unmonitored_alert("support.com", &ctx(), "<b>LP / Money Site:</b>");
        let header = text.find("MONITORING NOT ENABLED").unwrap();
        let context = text.find("SEO NETWORK CONTEXT").unwrap();
        let structure = text.find("CURRENT SEO STRUCTURE").unwrap();
        let impact = text.find("IMPACT SUMMARY").unwrap();
        let action = text.find("NEXT ACTION").unwrap();
        assert!(header < context && context < structure && structure < impact && impact < action);
    }

    #[test]
    fn soft_block_alert_is_warning() {
        let text = soft_block_alert(
            "support.com",
            seonoc_common::types::SoftBlockType::CloudflareChallenge,
            Some(403),
            &ctx(),
            "",
        );
        assert!(text.contains("WARNING"));
        assert!(text.contains("cloudflare_challenge"));
        assert!(text.contains("403"));
    }

    #[test]
    fn recovery_alert_names_previous_state() {
        let text = recovery_alert("support.com", PingStatus::Down);
        assert!(text.contains("was down"));
    }
}
