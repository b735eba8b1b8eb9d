//! Shared context assembly for monitoring alerts.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde_json::{json, Value};

use seonoc_common::settings::{SystemTimezone, KEY_SYSTEM_TIMEZONE};
use seonoc_common::types::{AssetDomain, Severity, StructureEntry};
use seonoc_graph::enrich::network_snapshot_for;
use seonoc_graph::SeoContext;
use seonoc_store::StoreClient;
use seonoc_templates::ContextBuilder;

/// Every structure entry plus a domain-id → domain-name map, loaded once
/// per monitoring pass.
pub async fn seo_maps(
    store: &StoreClient,
) -> Result<(Vec<StructureEntry>, HashMap<String, String>)> {
    let entries = store.entries().find_all().await?;
    let ids: Vec<String> = entries
        .iter()
        .map(|e| e.asset_domain_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let domains = store.domains().find_by_ids(&ids).await?;
    let names = domains.into_iter().map(|d| (d.id, d.domain_name)).collect();
    Ok((entries, names))
}

/// Template context for domain_down / domain_expiration events.
#[allow(clippy::too_many_arguments)]
pub async fn monitoring_context(
    store: &StoreClient,
    domain: &AssetDomain,
    ctx: &SeoContext,
    severity: Severity,
    entries: &[StructureEntry],
    names: &HashMap<String, String>,
    days_until_expiry: Option<i64>,
    reason: Option<&str>,
) -> Result<Value> {
    let tz: SystemTimezone = store.settings().get(KEY_SYSTEM_TIMEZONE).await?;

    let mut builder = ContextBuilder::new(&tz).domain(
        &domain.domain_name,
        &domain
            .expiration_date
            .map(|d| tz.format_date(d))
            .unwrap_or_default(),
        days_until_expiry.map(|d| json!(d)).unwrap_or(json!("")),
        "Unknown",
        reason.unwrap_or(""),
        domain
            .last_http_code
            .map(|c| json!(c))
            .unwrap_or(json!("-")),
        "-",
    );

    if let Some(reference) = ctx.references.first() {
        let network_name = store
            .networks()
            .find_by_id(&reference.network_id)
            .await?
            .map(|n| n.name)
            .unwrap_or_else(|| "Unknown".to_string());
        let structure = network_snapshot_for(&reference.network_id, entries, names);
        builder = builder
            .network(&network_name, &reference.network_id)
            .node(
                &domain.domain_name,
                "",
                if reference.is_main { "Main (LP)" } else { "Supporting" },
                reference
                    .tier
                    .map(|t| json!(t))
                    .unwrap_or(json!("orphan")),
                "",
                "",
                "",
                &reference.entry_id,
            )
            .structure(&structure, &ctx.upstream_chain_text(), &ctx.downstream_text());
    } else {
        builder = builder
            .network("(not in any SEO network)", "")
            .node(&domain.domain_name, "", "-", json!(""), "", "", "", "")
            .structure("", "(not in any SEO network)", "0 nodes");
    }

    Ok(builder
        .impact(
            severity,
            reason.unwrap_or(""),
            ctx.impact.downstream_nodes_count,
        )
        .build())
}

/// Minimal HTML body for severity-gated admin emails.
pub fn alert_email_html(title: &str, domain_name: &str, severity: Severity, detail: &str) -> String {
    format!(
        "<div style=\"font-family: monospace;\">\
         <h2>{title}</h2>\
         <p><b>Domain:</b> {domain_name}</p>\
         <p><b>Severity:</b> {}</p>\
         <p>{detail}</p>\
         </div>",
        severity.as_upper()
    )
}
