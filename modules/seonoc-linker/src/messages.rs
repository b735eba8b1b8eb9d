//! Chat message bodies for conflict lifecycle events. Built in code (these
//! are system events with no operator-editable template) and sent through
//! the SEO channel's seo_change topic.

use seonoc_common::types::{Conflict, Severity};
use seonoc_graph::DetectedConflict;

const BAR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn severity_emoji(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🚨",
        Severity::High => "🔴",
        Severity::Medium => "🟠",
        Severity::Low => "🟡",
    }
}

pub fn conflict_detected(
    detected: &DetectedConflict,
    network_name: &str,
    recurrence: Option<u32>,
) -> String {
    let header = match recurrence {
        Some(n) => format!("🔄 RECURRING SEO CONFLICT #{n}"),
        None => "⚠️ NEW SEO CONFLICT DETECTED".to_string(),
    };

    let mut lines = vec![
        BAR.to_string(),
        header,
        BAR.to_string(),
        String::new(),
        format!("Type          : {}", detected.conflict_type.label()),
        format!(
            "Severity      : {} {}",
            severity_emoji(detected.severity),
            detected.severity.as_upper()
        ),
        format!("Network       : {network_name}"),
        format!("Domain        : {}", detected.domain_name),
        String::new(),
        "Affected Nodes:".to_string(),
        format!("  • {}", detected.node_a_label),
    ];
    if let Some(node_b) = &detected.node_b_label {
        lines.push(format!("  • {node_b}"));
    }
    lines.extend([
        String::new(),
        BAR.to_string(),
        "📋 DESCRIPTION:".to_string(),
        BAR.to_string(),
        detected.description.clone(),
        String::new(),
    ]);
    if let Some(suggestion) = &detected.suggestion {
        lines.extend([
            BAR.to_string(),
            "💡 SUGGESTED FIX:".to_string(),
            BAR.to_string(),
            suggestion.clone(),
            String::new(),
        ]);
    }
    lines.extend([
        BAR.to_string(),
        "⏰ ACTION REQUIRED".to_string(),
        BAR.to_string(),
        "An optimization task has been auto-created.".to_string(),
        "Please review and resolve this conflict.".to_string(),
    ]);
    if let Some(n) = recurrence {
        lines.extend([
            String::new(),
            format!("⚠️ This conflict has recurred {n} time(s)!"),
            "Consider a permanent structural fix.".to_string(),
        ]);
    }
    lines.join("\n")
}

pub fn conflict_resolved(conflict: &Conflict, resolver_name: &str) -> String {
    let mut lines = vec![
        BAR.to_string(),
        "✅ SEO CONFLICT RESOLVED".to_string(),
        BAR.to_string(),
        String::new(),
        format!("Type          : {}", conflict.conflict_type.label()),
        format!("Domain        : {}", conflict.domain_name),
        format!("Resolved By   : {resolver_name}"),
        String::new(),
        "The conflict has been resolved and the".to_string(),
        "SEO structure has been validated.".to_string(),
    ];
    if conflict.recurrence_count > 0 {
        lines.extend([
            String::new(),
            format!(
                "📊 This conflict had recurred {} time(s).",
                conflict.recurrence_count
            ),
        ]);
    }
    lines.join("\n")
}
