//! Context builders for template rendering. All formatting happens here
//! (labels, pre-joined lists, local-timezone timestamps) so rendering stays
//! a pure substitution.

use chrono::Utc;
use serde_json::{json, Map, Value};

use seonoc_common::settings::SystemTimezone;
use seonoc_common::types::{ActorRef, Complaint, Optimization, Severity};

pub struct ContextBuilder {
    root: Map<String, Value>,
}

impl ContextBuilder {
    pub fn new(tz: &SystemTimezone) -> Self {
        let now = Utc::now();
        let mut root = Map::new();
        root.insert(
            "timestamp".to_string(),
            json!({
                "local": tz.format(now),
                "iso": now.to_rfc3339(),
                "date": tz.format_date(now),
                "time": tz.format_time(now),
            }),
        );
        // Tagging defaults so templates render "(none)" instead of blanks.
        root.insert(
            "telegram".to_string(),
            json!({
                "leaders": "(none)",
                "project_managers": "  (none)",
                "tagged_users": "  (none)",
            }),
        );
        Self { root }
    }

    pub fn actor(mut self, actor: &ActorRef, role: &str) -> Self {
        self.root.insert(
            "user".to_string(),
            json!({
                "display_name": display_name(actor),
                "email": actor.email,
                "role": role,
                "id": actor.user_id,
            }),
        );
        self
    }

    pub fn network(mut self, name: &str, id: &str) -> Self {
        self.root.insert(
            "network".to_string(),
            json!({ "name": name, "id": id, "description": "" }),
        );
        self
    }

    pub fn brand(mut self, name: &str, id: &str) -> Self {
        self.root
            .insert("brand".to_string(), json!({ "name": name, "id": id }));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn node(
        mut self,
        domain: &str,
        full_path: &str,
        role: &str,
        tier: Value,
        status: &str,
        index: &str,
        target: &str,
        id: &str,
    ) -> Self {
        self.root.insert(
            "node".to_string(),
            json!({
                "domain": domain,
                "full_path": full_path,
                "role": role,
                "tier": tier,
                "status": status,
                "index": index,
                "target": target,
                "id": id,
            }),
        );
        self
    }

    pub fn change(
        mut self,
        action: &str,
        action_label: &str,
        reason: &str,
        before: &str,
        after: &str,
        details: &str,
    ) -> Self {
        self.root.insert(
            "change".to_string(),
            json!({
                "action": action,
                "action_label": action_label,
                "reason": if reason.is_empty() { "(no rationale)" } else { reason },
                "before": before,
                "after": after,
                "details": details,
            }),
        );
        self
    }

    pub fn optimization(mut self, opt: &Optimization) -> Self {
        let impacts: Vec<&str> = opt.expected_impact.iter().map(|i| i.label()).collect();
        let reports: Vec<String> = opt.report_urls.iter().map(|r| r.url.clone()).collect();
        self.root.insert(
            "optimization".to_string(),
            json!({
                "title": opt.title,
                "description": opt.description,
                "type": opt.activity_type,
                "type_label": activity_type_label(&opt.activity_type),
                "status": opt.status,
                "status_label": opt.status.label(),
                "targets": bullet_list(&opt.target_domains),
                "keywords": bullet_list(&opt.keywords),
                "reports": bullet_list(&reports),
                "expected_impact": impacts.join(", "),
            }),
        );
        self
    }

    pub fn complaint(mut self, complaint: &Complaint) -> Self {
        let category = complaint.category.as_deref().unwrap_or("");
        self.root.insert(
            "complaint".to_string(),
            json!({
                "reason": complaint.reason,
                "priority": complaint.priority,
                "priority_label": priority_label(complaint.priority),
                "category": category,
                "category_label": category_label(category),
                "reports": bullet_list(&complaint.report_urls),
                "status": complaint.status,
            }),
        );
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn domain(
        mut self,
        name: &str,
        expiry_date: &str,
        days_until_expiry: Value,
        registrar: &str,
        status: &str,
        http_status: Value,
        response_time: &str,
    ) -> Self {
        self.root.insert(
            "domain".to_string(),
            json!({
                "name": name,
                "expiry_date": expiry_date,
                "days_until_expiry": days_until_expiry,
                "registrar": registrar,
                "status": status,
                "http_status": http_status,
                "response_time": response_time,
            }),
        );
        self
    }

    pub fn impact(mut self, severity: Severity, description: &str, affected_count: usize) -> Self {
        self.root.insert(
            "impact".to_string(),
            json!({
                "severity": severity.as_upper(),
                "severity_emoji": severity.emoji(),
                "description": description,
                "affected_count": affected_count,
            }),
        );
        self
    }

    pub fn structure(
        mut self,
        current: &str,
        upstream_chain: &str,
        downstream_impact: &str,
    ) -> Self {
        self.root.insert(
            "structure".to_string(),
            json!({
                "current": current,
                "upstream_chain": upstream_chain,
                "downstream_impact": downstream_impact,
                "before_deletion": current,
            }),
        );
        self
    }

    pub fn reminder(mut self, days_in_progress: i64, title: &str, status_label: &str) -> Self {
        self.root.insert(
            "reminder".to_string(),
            json!({
                "days_in_progress": days_in_progress,
                "optimization_title": title,
                "optimization_status": status_label,
            }),
        );
        self
    }

    /// Chat usernames, leading '@' normalized.
    pub fn tagging(
        mut self,
        leaders: &[String],
        project_managers: &[String],
        tagged_users: &[String],
    ) -> Self {
        self.root.insert(
            "telegram".to_string(),
            json!({
                "leaders": inline_mentions(leaders),
                "project_managers": stacked_mentions(project_managers),
                "tagged_users": stacked_mentions(tagged_users),
            }),
        );
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.root)
    }
}

fn display_name(actor: &ActorRef) -> String {
    if !actor.display_name.is_empty() {
        return actor.display_name.clone();
    }
    // Fallback: title-cased email prefix.
    let prefix = actor.email.split('@').next().unwrap_or("Unknown");
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Unknown".to_string(),
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "  (none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("  • {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn inline_mentions(usernames: &[String]) -> String {
    if usernames.is_empty() {
        return "(none)".to_string();
    }
    usernames
        .iter()
        .map(|u| format!("@{}", u.trim_start_matches('@')))
        .collect::<Vec<_>>()
        .join(" ")
}

fn stacked_mentions(usernames: &[String]) -> String {
    if usernames.is_empty() {
        return "  (none)".to_string();
    }
    usernames
        .iter()
        .map(|u| format!("  • @{}", u.trim_start_matches('@')))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn activity_type_label(activity_type: &str) -> String {
    match activity_type {
        "backlink_campaign" => "Backlink Campaign".to_string(),
        "content_optimization" => "Content Optimization".to_string(),
        "technical_seo" => "Technical SEO".to_string(),
        "link_building" => "Link Building".to_string(),
        "on_page" => "On-Page SEO".to_string(),
        "off_page" => "Off-Page SEO".to_string(),
        "conflict_resolution" => "Conflict Resolution".to_string(),
        "other" => "Other".to_string(),
        other => title_case(other),
    }
}

fn priority_label(priority: Severity) -> String {
    let emoji = match priority {
        Severity::Low => "🔵",
        Severity::Medium => "🟡",
        _ => "🔴",
    };
    let label = match priority {
        Severity::Low => "Low",
        Severity::Medium => "Medium",
        Severity::High => "High",
        Severity::Critical => "Critical",
    };
    format!("{emoji} Priority: {label}")
}

fn category_label(category: &str) -> String {
    match category {
        "communication" => "Communication".to_string(),
        "deadline" => "Deadline".to_string(),
        "quality" => "Quality".to_string(),
        "process" => "Process".to_string(),
        "" => "General".to_string(),
        other => title_case(other),
    }
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
