use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use seonoc_common::types::{Channel, EventType, NotificationTemplate};
use seonoc_store::TemplateRepo;

use crate::defaults::default_template;
use crate::vars;

/// Scan a template body for `{{ ... }}` tokens, returning the trimmed inner
/// names in order of appearance.
pub fn extract_variables(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let bytes = body.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if let Some(end) = body[i + 2..].find("}}") {
                let inner = body[i + 2..i + 2 + end].trim();
                if !inner.is_empty() {
                    out.push(inner.to_string());
                }
                i += 2 + end + 2;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Render a template against a nested context. Missing paths render as the
/// empty string; lists render comma-joined. Pure: no I/O, no side effects.
pub fn render(body: &str, context: &Value) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                out.push_str(&resolve(context, name));
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated token: emit literally.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve(context: &Value, path: &str) -> String {
    let mut current = context;
    for part in path.split('.') {
        match current.get(part) {
            Some(v) => current = v,
            None => return String::new(),
        }
    }
    stringify(current)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => String::new(),
    }
}

/// Returns the variables a template references that are not in the
/// allow-list. Empty means the template is valid.
pub fn validate(body: &str) -> Vec<String> {
    let mut invalid: Vec<String> = extract_variables(body)
        .into_iter()
        .filter(|v| !vars::is_allowed(v))
        .collect();
    invalid.dedup();
    invalid
}

/// Template lookup with an in-process cache and default fallback.
///
/// Readers hit the RwLock read path after first load; any template write
/// goes through `invalidate`, which clears the pair atomically.
pub struct TemplateStore {
    repo: TemplateRepo,
    cache: RwLock<HashMap<(Channel, EventType), NotificationTemplate>>,
}

impl TemplateStore {
    pub fn new(repo: TemplateRepo) -> Self {
        Self {
            repo,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// DB row if present, else the code-embedded default.
    pub async fn get(
        &self,
        channel: Channel,
        event_type: EventType,
    ) -> Result<Option<NotificationTemplate>> {
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(channel, event_type))
        {
            return Ok(Some(hit.clone()));
        }

        if let Some(template) = self.repo.find(channel, event_type).await? {
            self.cache
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .insert((channel, event_type), template.clone());
            return Ok(Some(template));
        }

        Ok(default_template(channel, event_type).map(|(title, body)| NotificationTemplate {
            id: String::new(),
            channel,
            event_type,
            title: title.to_string(),
            template_body: body.to_string(),
            default_template_body: body.to_string(),
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: None,
        }))
    }

    /// Render the (channel, event) template against `context`.
    /// `None` when the pair has no template or is disabled; callers skip
    /// the send in that case.
    pub async fn render_event(
        &self,
        channel: Channel,
        event_type: EventType,
        context: &Value,
    ) -> Result<Option<String>> {
        match self.get(channel, event_type).await? {
            Some(t) if t.enabled => Ok(Some(render(&t.template_body, context))),
            _ => Ok(None),
        }
    }

    /// Drop a cached pair after an update or reset.
    pub fn invalidate(&self, channel: Channel, event_type: EventType) {
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(channel, event_type));
    }

    pub fn repo(&self) -> &TemplateRepo {
        &self.repo
    }

    /// Insert the code-embedded defaults for any (channel, event) pair that
    /// has no DB row yet. Called at startup.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut created = 0;
        for (channel, event_type) in crate::defaults::DEFAULT_EVENTS {
            if self.repo.find(*channel, *event_type).await?.is_some() {
                continue;
            }
            let Some((title, body)) = default_template(*channel, *event_type) else {
                continue;
            };
            let now = Utc::now();
            self.repo
                .insert(&NotificationTemplate {
                    id: Uuid::new_v4().to_string(),
                    channel: *channel,
                    event_type: *event_type,
                    title: title.to_string(),
                    template_body: body.to_string(),
                    default_template_body: body.to_string(),
                    enabled: true,
                    created_at: now,
                    updated_at: now,
                    updated_by: None,
                })
                .await?;
            created += 1;
            info!(
                channel = channel.as_str(),
                event = event_type.as_str(),
                "Created default template"
            );
        }
        Ok(created)
    }
}

/// Fixed sample context so operators can preview a template before saving.
pub fn sample_context() -> Value {
    serde_json::json!({
        "user": {
            "display_name": "Alex Operator",
            "email": "alex@example.com",
            "role": "seo_manager",
            "id": "user-1",
        },
        "network": { "name": "Net-1", "id": "net-1", "description": "" },
        "brand": { "name": "Acme", "id": "brand-1" },
        "node": {
            "domain": "support.com",
            "full_path": "/blog",
            "role": "Supporting",
            "tier": 1,
            "status": "Canonical",
            "index": "Index",
            "target": "money.com",
            "id": "entry-2",
        },
        "change": {
            "action": "update_node",
            "action_label": "Updated Node",
            "reason": "sample change rationale",
            "before": "planned",
            "after": "in_progress",
            "details": "• Node: support.com/blog",
        },
        "optimization": {
            "title": "Sample optimization",
            "description": "Sample description",
            "type": "content_optimization",
            "type_label": "Content Optimization",
            "status": "in_progress",
            "status_label": "In Progress",
            "targets": "  • support.com",
            "keywords": "  • sample keyword",
            "reports": "  (none)",
            "expected_impact": "Authority",
        },
        "complaint": {
            "reason": "sample complaint",
            "priority": "medium",
            "priority_label": "🟡 Priority: Medium",
            "category": "quality",
            "category_label": "Quality",
            "reports": "  (none)",
            "status": "open",
        },
        "domain": {
            "name": "support.com",
            "expiry_date": "2026-09-01",
            "days_until_expiry": 30,
            "registrar": "Sample Registrar",
            "status": "active",
            "http_status": 200,
            "response_time": "120 ms",
        },
        "impact": {
            "severity": "HIGH",
            "severity_emoji": "🟠",
            "description": "Tier 1 supporter",
            "affected_count": 2,
        },
        "timestamp": {
            "local": "2026-08-01 17:00:00 GMT+7",
            "iso": "2026-08-01T10:00:00Z",
            "date": "2026-08-01",
            "time": "17:00:00",
        },
        "telegram": {
            "leaders": "@lead",
            "project_managers": "  • @manager",
            "tagged_users": "  • @manager",
        },
        "structure": {
            "current": "LP / Money Site:\n  • money.com [Primary]",
            "upstream_chain": "support.com/blog [Canonical] → money.com [Primary]",
            "downstream_impact": "2 nodes",
            "before_deletion": "LP / Money Site:\n  • money.com [Primary]",
        },
        "reminder": {
            "days_in_progress": 4,
            "optimization_title": "Sample optimization",
            "optimization_status": "In Progress",
        },
    })
}
