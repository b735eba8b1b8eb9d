//! Code-embedded default templates. A (channel, event) pair falls back to
//! these when no DB row exists; "reset" restores them.

use seonoc_common::types::{Channel, EventType};

/// Every pair that ships with a default.
pub const DEFAULT_EVENTS: &[(Channel, EventType)] = &[
    (Channel::Telegram, EventType::SeoChange),
    (Channel::Telegram, EventType::SeoNetworkCreated),
    (Channel::Telegram, EventType::SeoOptimization),
    (Channel::Telegram, EventType::SeoOptimizationStatus),
    (Channel::Telegram, EventType::SeoComplaint),
    (Channel::Telegram, EventType::SeoProjectComplaint),
    (Channel::Telegram, EventType::SeoReminder),
    (Channel::Telegram, EventType::DomainExpiration),
    (Channel::Telegram, EventType::DomainDown),
    (Channel::Telegram, EventType::SeoNodeDeleted),
    (Channel::Telegram, EventType::Test),
];

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━";

/// (title, body) for a pair, or None when the pair has no default.
pub fn default_template(channel: Channel, event_type: EventType) -> Option<(&'static str, &'static str)> {
    if channel != Channel::Telegram {
        return None;
    }
    let pair = match event_type {
        EventType::SeoChange => ("SEO Structure Update", SEO_CHANGE),
        EventType::SeoNetworkCreated => ("New SEO Network Created", SEO_NETWORK_CREATED),
        EventType::SeoOptimization => ("SEO Optimization Activity", SEO_OPTIMIZATION),
        EventType::SeoOptimizationStatus => {
            ("SEO Optimization Status Update", SEO_OPTIMIZATION_STATUS)
        }
        EventType::SeoComplaint => ("SEO Optimization Complaint", SEO_COMPLAINT),
        EventType::SeoProjectComplaint => ("Project-Level Complaint", SEO_PROJECT_COMPLAINT),
        EventType::SeoReminder => ("SEO Optimization Reminder", SEO_REMINDER),
        EventType::DomainExpiration => ("Domain Expiration Alert", DOMAIN_EXPIRATION),
        EventType::DomainDown => ("Domain Down Alert", DOMAIN_DOWN),
        EventType::SeoNodeDeleted => ("SEO Node Deleted", SEO_NODE_DELETED),
        EventType::Test => ("Test Notification", TEST),
    };
    Some(pair)
}

const SEO_CHANGE: &str = "👤 <b>SEO STRUCTURE UPDATE</b>

{{user.display_name}} changed the SEO structure of network '<b>{{network.name}}</b>' for brand '<b>{{brand.name}}</b>':

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>ACTION SUMMARY</b>
━━━━━━━━━━━━━━━━━━━━━━
• Action: {{change.action_label}}
• By: {{user.display_name}} ({{user.email}})
• Time: {{timestamp.local}}

━━━━━━━━━━━━━━━━━━━━━━
📝 <b>CHANGE RATIONALE</b>
━━━━━━━━━━━━━━━━━━━━━━
\"{{change.reason}}\"

━━━━━━━━━━━━━━━━━━━━━━
{{change.details}}

━━━━━━━━━━━━━━━━━━━━━━
🧭 <b>CURRENT SEO STRUCTURE</b>
━━━━━━━━━━━━━━━━━━━━━━
{{structure.current}}

👁 <b>CC:</b> {{telegram.leaders}}";

const SEO_NETWORK_CREATED: &str = "👤 <b>NEW SEO NETWORK CREATED</b>

{{user.display_name}} created SEO network '<b>{{network.name}}</b>' for brand '<b>{{brand.name}}</b>'.

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>NETWORK DETAILS</b>
━━━━━━━━━━━━━━━━━━━━━━
• Network: {{network.name}}
• Brand: {{brand.name}}
• Created by: {{user.display_name}} ({{user.email}})
• Time: {{timestamp.local}}

━━━━━━━━━━━━━━━━━━━━━━
🧭 <b>INITIAL SEO STRUCTURE</b>
━━━━━━━━━━━━━━━━━━━━━━
{{structure.current}}

👁 <b>CC:</b> {{telegram.leaders}}";

const SEO_OPTIMIZATION: &str = "📘 <b>SEO OPTIMIZATION ACTIVITY</b>

<b>{{user.display_name}}</b> added an SEO optimization activity
on network '<b>{{network.name}}</b>' for brand '<b>{{brand.name}}</b>'.

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>SUMMARY</b>
━━━━━━━━━━━━━━━━━━━━━━
• <b>Type:</b> {{optimization.type_label}}
• <b>Status:</b> {{optimization.status_label}}
• <b>By:</b> {{user.display_name}} ({{user.email}})
• <b>Time:</b> {{timestamp.local}}

📝 <b>Title:</b>
{{optimization.title}}

📄 <b>Description:</b>
\"{{optimization.description}}\"

🎯 <b>Targets:</b>
{{optimization.targets}}

🔑 <b>Keywords:</b>
{{optimization.keywords}}

📊 <b>Expected Impact:</b>
{{optimization.expected_impact}}

📎 <b>Reports:</b>
{{optimization.reports}}

━━━━━━━━━━━━━━━━━━━━━━
<i>⚠️ Note: no SEO structure change</i>

👁 <b>CC:</b> {{telegram.leaders}}";

const SEO_OPTIMIZATION_STATUS: &str = "{{impact.severity_emoji}} <b>SEO OPTIMIZATION STATUS UPDATE</b>

<b>{{user.display_name}}</b> changed the status of an optimization activity
on network '<b>{{network.name}}</b>' for brand '<b>{{brand.name}}</b>'.

━━━━━━━━━━━━━━━━━━━━━━
📝 <b>Activity:</b>
{{optimization.title}}

🔄 <b>Status Change:</b>
{{change.before}} → <b>{{change.after}}</b>

👤 <b>Changed by:</b> {{user.display_name}} ({{user.email}})
🕐 <b>Time:</b> {{timestamp.local}}

━━━━━━━━━━━━━━━━━━━━━━
<i>⚠️ Note: no SEO structure change</i>

👁 <b>CC:</b> {{telegram.leaders}}";

const SEO_COMPLAINT: &str = "🚨 <b>SEO OPTIMIZATION COMPLAINT</b>

<b>{{user.display_name}}</b> filed a complaint
on SEO network '<b>{{network.name}}</b>' for brand '<b>{{brand.name}}</b>'.

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>OPTIMIZATION DETAILS</b>
━━━━━━━━━━━━━━━━━━━━━━
• Title: {{optimization.title}}
• Type: {{optimization.type_label}}
• Status: {{optimization.status_label}}

━━━━━━━━━━━━━━━━━━━━━━
👥 <b>Network Managers (tagged):</b>
{{telegram.project_managers}}

📁 <b>Category:</b> {{complaint.category_label}}
{{complaint.priority_label}}

━━━━━━━━━━━━━━━━━━━━━━
📝 <b>Complaint Reason:</b>
\"{{complaint.reason}}\"

📎 <b>Related Reports:</b>
{{complaint.reports}}

🕐 <b>Time:</b> {{timestamp.local}}

━━━━━━━━━━━━━━━━━━━━━━
⚠️ <b>Action Required:</b>
<i>Please review and respond to this complaint.</i>";

const SEO_PROJECT_COMPLAINT: &str = "🚨 <b>PROJECT-LEVEL COMPLAINT</b>

<b>{{user.display_name}}</b> filed a complaint
on SEO network '<b>{{network.name}}</b>'.

<i>This complaint is not tied to a specific optimization;
it concerns the management of the project as a whole.</i>

━━━━━━━━━━━━━━━━━━━━━━
👥 <b>Network Managers (tagged):</b>
{{telegram.project_managers}}

📁 <b>Category:</b> {{complaint.category_label}}
{{complaint.priority_label}}

━━━━━━━━━━━━━━━━━━━━━━
📝 <b>Complaint Reason:</b>
\"{{complaint.reason}}\"

📎 <b>Related Reports:</b>
{{complaint.reports}}

🕐 <b>Time:</b> {{timestamp.local}}

━━━━━━━━━━━━━━━━━━━━━━
⚠️ <b>Action Required:</b>
<i>Please review and respond to this complaint.</i>";

const SEO_REMINDER: &str = "⏰ <b>SEO OPTIMIZATION REMINDER</b>

The optimization below has been running for <b>{{reminder.days_in_progress}} days</b> and is still \"<b>{{reminder.optimization_status}}</b>\".

━━━━━━━━━━━━━━━━━━━━━━
📝 <b>Optimization Details:</b>
• <b>Network:</b> {{network.name}}
• <b>Brand:</b> {{brand.name}}
• <b>Title:</b> {{optimization.title}}
• <b>Status:</b> {{optimization.status_label}}

━━━━━━━━━━━━━━━━━━━━━━
👥 <b>Tagged:</b>
{{telegram.tagged_users}}

━━━━━━━━━━━━━━━━━━━━━━
⚠️ <b>Action Required:</b>
<i>Update this optimization's status or add a progress note.</i>";

const DOMAIN_EXPIRATION: &str = "⚠️ <b>DOMAIN EXPIRATION ALERT</b>

Domain <b>{{domain.name}}</b> expires in <b>{{domain.days_until_expiry}} days</b>.

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>DOMAIN DETAILS</b>
━━━━━━━━━━━━━━━━━━━━━━
• Domain: {{domain.name}}
• Expiry Date: {{domain.expiry_date}}
• Registrar: {{domain.registrar}}

━━━━━━━━━━━━━━━━━━━━━━
🧭 <b>SEO NETWORK CONTEXT</b>
━━━━━━━━━━━━━━━━━━━━━━
• Network: {{network.name}}
• Role: {{node.role}}
• Tier: {{node.tier}}

📊 <b>IMPACT ANALYSIS</b>
━━━━━━━━━━━━━━━━━━━━━━
• Severity: {{impact.severity_emoji}} {{impact.severity}}
• Upstream Chain: {{structure.upstream_chain}}
• Downstream Impact: {{structure.downstream_impact}}

━━━━━━━━━━━━━━━━━━━━━━
⚠️ <b>Action Required:</b>
<i>Renew the domain before expiration to avoid SEO impact.</i>";

const DOMAIN_DOWN: &str = "🔴 <b>DOMAIN DOWN ALERT</b>

Domain <b>{{domain.name}}</b> is unreachable!

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>STATUS DETAILS</b>
━━━━━━━━━━━━━━━━━━━━━━
• Domain: {{domain.name}}
• HTTP Status: {{domain.http_status}}
• Response Time: {{domain.response_time}}
• Checked At: {{timestamp.local}}

━━━━━━━━━━━━━━━━━━━━━━
🧭 <b>SEO NETWORK CONTEXT</b>
━━━━━━━━━━━━━━━━━━━━━━
• Network: {{network.name}}
• Role: {{node.role}}
• Tier: {{node.tier}}

📊 <b>IMPACT ANALYSIS</b>
━━━━━━━━━━━━━━━━━━━━━━
• Severity: {{impact.severity_emoji}} {{impact.severity}}
• Affected Nodes: {{impact.affected_count}}
• Upstream Chain: {{structure.upstream_chain}}

━━━━━━━━━━━━━━━━━━━━━━
🚨 <b>URGENT Action Required:</b>
<i>Investigate and restore the domain immediately.</i>";

const SEO_NODE_DELETED: &str = "🗑️ <b>SEO NODE DELETED</b>

<b>{{user.display_name}}</b> deleted a node from network '<b>{{network.name}}</b>' for brand '<b>{{brand.name}}</b>'.

━━━━━━━━━━━━━━━━━━━━━━
📌 <b>NODE DETAILS (BEFORE DELETION)</b>
━━━━━━━━━━━━━━━━━━━━━━
• <b>Node:</b> {{node.domain}}{{node.full_path}}
• <b>Role:</b> {{node.role}}
• <b>Status:</b> {{node.status}}
• <b>Index:</b> {{node.index}}
• <b>Target:</b> {{node.target}}

━━━━━━━━━━━━━━━━━━━━━━
📝 <b>DELETION RATIONALE</b>
━━━━━━━━━━━━━━━━━━━━━━
\"{{change.reason}}\"

━━━━━━━━━━━━━━━━━━━━━━
⚠️ <b>DELETION IMPACT</b>
━━━━━━━━━━━━━━━━━━━━━━
• <b>Authority Flow:</b> BROKEN
• <b>Severity:</b> {{impact.severity}}
• <b>Affected Nodes:</b> {{impact.affected_count}}

━━━━━━━━━━━━━━━━━━━━━━
🧭 <b>SEO STRUCTURE (BEFORE DELETION)</b>
━━━━━━━━━━━━━━━━━━━━━━
{{structure.before_deletion}}

━━━━━━━━━━━━━━━━━━━━━━
🕐 <b>Time:</b> {{timestamp.local}}
👤 <b>By:</b> {{user.display_name}} ({{user.email}})

👁 <b>CC:</b> {{telegram.leaders}}";

const TEST: &str = "🔔 <b>TEST MESSAGE - NO SEO CHANGE</b>

This is a test message to verify the chat notification configuration.

━━━━━━━━━━━━━━━━━━━━━━
• Sent by: {{user.display_name}} ({{user.email}})
• Time: {{timestamp.local}}
━━━━━━━━━━━━━━━━━━━━━━

✅ If you can read this, the configuration works.";
