//! The template variable allow-list. This set is the only contract between
//! stored templates and the context builders; saving a template that
//! references anything else is rejected.

pub const ALLOWED_VARIABLES: &[&str] = &[
    // Actor
    "user.display_name",
    "user.email",
    "user.role",
    "user.id",
    // Network
    "network.name",
    "network.id",
    "network.description",
    // Brand
    "brand.name",
    "brand.id",
    // Node / structure entry
    "node.domain",
    "node.full_path",
    "node.role",
    "node.tier",
    "node.status",
    "node.index",
    "node.target",
    "node.id",
    // Change / action
    "change.action",
    "change.action_label",
    "change.reason",
    "change.before",
    "change.after",
    "change.details",
    // Optimization
    "optimization.title",
    "optimization.description",
    "optimization.type",
    "optimization.type_label",
    "optimization.status",
    "optimization.status_label",
    "optimization.targets",
    "optimization.keywords",
    "optimization.reports",
    "optimization.expected_impact",
    // Complaint
    "complaint.reason",
    "complaint.priority",
    "complaint.priority_label",
    "complaint.category",
    "complaint.category_label",
    "complaint.reports",
    "complaint.status",
    // Domain monitoring
    "domain.name",
    "domain.expiry_date",
    "domain.days_until_expiry",
    "domain.registrar",
    "domain.status",
    "domain.http_status",
    "domain.response_time",
    // Impact / severity
    "impact.severity",
    "impact.severity_emoji",
    "impact.description",
    "impact.affected_count",
    // Timestamps (system timezone)
    "timestamp.local",
    "timestamp.iso",
    "timestamp.date",
    "timestamp.time",
    // Chat tagging
    "telegram.leaders",
    "telegram.project_managers",
    "telegram.tagged_users",
    // Structure / hierarchy
    "structure.current",
    "structure.upstream_chain",
    "structure.downstream_impact",
    "structure.before_deletion",
    // Reminders
    "reminder.days_in_progress",
    "reminder.optimization_title",
    "reminder.optimization_status",
];

pub fn is_allowed(name: &str) -> bool {
    ALLOWED_VARIABLES.contains(&name)
}
