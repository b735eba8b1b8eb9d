use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Severity (shared by conflicts, impact scoring, alerting) ---

/// Ascending order so `a.max(b)` elevates severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Uppercase form used in alert bodies ("CRITICAL", "HIGH", ...).
    pub fn as_upper(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Low => "🟢",
            Severity::Medium => "🟡",
            Severity::High => "🟠",
            Severity::Critical => "🔴",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown Severity: {other}")),
        }
    }
}

// --- Asset domains ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    Active,
    Inactive,
    Expired,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitoringInterval {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    Hourly,
    #[serde(rename = "daily")]
    Daily,
}

impl MonitoringInterval {
    pub fn as_duration(&self) -> chrono::Duration {
        match self {
            MonitoringInterval::FiveMinutes => chrono::Duration::minutes(5),
            MonitoringInterval::FifteenMinutes => chrono::Duration::minutes(15),
            MonitoringInterval::Hourly => chrono::Duration::hours(1),
            MonitoringInterval::Daily => chrono::Duration::days(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PingStatus {
    Up,
    Down,
    SoftBlocked,
    #[default]
    Unknown,
}

impl PingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PingStatus::Up => "up",
            PingStatus::Down => "down",
            PingStatus::SoftBlocked => "soft_blocked",
            PingStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    #[default]
    Active,
    ExpiredPending,
    ExpiredReleased,
    Inactive,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftBlockType {
    CloudflareChallenge,
    Captcha,
    GeoBlocked,
    BotProtection,
}

impl SoftBlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoftBlockType::CloudflareChallenge => "cloudflare_challenge",
            SoftBlockType::Captcha => "captcha",
            SoftBlockType::GeoBlocked => "geo_blocked",
            SoftBlockType::BotProtection => "bot_protection",
        }
    }
}

/// A registered DNS name owned by a brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDomain {
    pub id: String,
    pub domain_name: String,
    pub brand_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub registrar_id: Option<String>,
    pub status: DomainStatus,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub monitoring_enabled: bool,
    #[serde(default = "default_monitoring_interval")]
    pub monitoring_interval: MonitoringInterval,
    #[serde(default)]
    pub ping_status: PingStatus,
    #[serde(default)]
    pub last_http_code: Option<u16>,
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub soft_block_type: Option<SoftBlockType>,
    #[serde(default)]
    pub domain_lifecycle_status: LifecycleStatus,
    #[serde(default)]
    pub quarantine_category: Option<String>,
    #[serde(default)]
    pub quarantined_by: Option<String>,
    #[serde(default)]
    pub quarantined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub released_by: Option<String>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_monitoring_interval() -> MonitoringInterval {
    MonitoringInterval::Hourly
}

impl AssetDomain {
    /// A domain used in any SEO structure with an active-ish lifecycle and no
    /// quarantine must be monitored; anything else is exempt.
    pub fn requires_monitoring(&self) -> bool {
        matches!(
            self.domain_lifecycle_status,
            LifecycleStatus::Active | LifecycleStatus::ExpiredPending
        ) && self.quarantine_category.is_none()
    }
}

/// Owns domains and SEO networks; scopes user access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// --- SEO networks and structure entries ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityMode {
    #[default]
    BrandBased,
    Restricted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoNetwork {
    pub id: String,
    pub brand_id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub visibility_mode: VisibilityMode,
    #[serde(default)]
    pub manager_ids: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainRole {
    Main,
    Supporting,
}

impl DomainRole {
    pub fn label(&self) -> &'static str {
        match self {
            DomainRole::Main => "Main (LP)",
            DomainRole::Supporting => "Supporting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Primary,
    Canonical,
    #[serde(rename = "301_redirect")]
    Redirect301,
    #[serde(rename = "302_redirect")]
    Redirect302,
    Restore,
}

impl NodeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Primary => "Primary",
            NodeStatus::Canonical => "Canonical",
            NodeStatus::Redirect301 => "301 Redirect",
            NodeStatus::Redirect302 => "302 Redirect",
            NodeStatus::Restore => "Restore",
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, NodeStatus::Redirect301 | NodeStatus::Redirect302)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Index,
    Noindex,
}

impl IndexStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IndexStatus::Index => "Index",
            IndexStatus::Noindex => "NoIndex",
        }
    }
}

/// One vertex in a network's graph: a (domain, path) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureEntry {
    pub id: String,
    pub network_id: String,
    pub asset_domain_id: String,
    /// Normalized: `None` is the domain root, otherwise "/path" without a
    /// trailing slash.
    #[serde(default)]
    pub optimized_path: Option<String>,
    pub domain_role: DomainRole,
    pub domain_status: NodeStatus,
    pub index_status: IndexStatus,
    #[serde(default)]
    pub target_entry_id: Option<String>,
    #[serde(default)]
    pub ranking_position: Option<u8>,
    #[serde(default)]
    pub primary_keyword: String,
    #[serde(default)]
    pub ranking_url: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Change ledger ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    CreateNode,
    UpdateNode,
    DeleteNode,
    RelinkNode,
    ChangeRole,
    ChangePath,
    CreateNetwork,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateNode => "create_node",
            ActionType::UpdateNode => "update_node",
            ActionType::DeleteNode => "delete_node",
            ActionType::RelinkNode => "relink_node",
            ActionType::ChangeRole => "change_role",
            ActionType::ChangePath => "change_path",
            ActionType::CreateNetwork => "create_network",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionType::CreateNode => "Created Node",
            ActionType::UpdateNode => "Updated Node",
            ActionType::DeleteNode => "Deleted Node",
            ActionType::RelinkNode => "Relinked Node Target",
            ActionType::ChangeRole => "Changed Node Role",
            ActionType::ChangePath => "Changed Node Path",
            ActionType::CreateNetwork => "Created SEO Network",
        }
    }

    /// Actions that bypass the per-network notification rate limit.
    pub fn bypasses_rate_limit(&self) -> bool {
        matches!(self, ActionType::DeleteNode | ActionType::ChangeRole)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// Ledger snapshot of a structure entry at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub domain_role: DomainRole,
    pub domain_status: NodeStatus,
    pub index_status: IndexStatus,
    #[serde(default)]
    pub optimized_path: Option<String>,
    #[serde(default)]
    pub target_entry_id: Option<String>,
    #[serde(default)]
    pub primary_keyword: String,
    #[serde(default)]
    pub ranking_position: Option<u8>,
    #[serde(default)]
    pub ranking_url: String,
    #[serde(default)]
    pub notes: String,
}

impl From<&StructureEntry> for EntrySnapshot {
    fn from(e: &StructureEntry) -> Self {
        Self {
            domain_role: e.domain_role,
            domain_status: e.domain_status,
            index_status: e.index_status,
            optimized_path: e.optimized_path.clone(),
            target_entry_id: e.target_entry_id.clone(),
            primary_keyword: e.primary_keyword.clone(),
            ranking_position: e.ranking_position,
            ranking_url: e.ranking_url.clone(),
            notes: e.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub name: String,
    pub brand_id: String,
    pub visibility_mode: VisibilityMode,
}

/// Tagged snapshot carried on a ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSnapshot {
    Entry(EntrySnapshot),
    Network(NetworkSnapshot),
}

/// Immutable record of one graph mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLog {
    pub id: String,
    pub network_id: String,
    pub brand_id: String,
    #[serde(default)]
    pub entry_id: Option<String>,
    pub action_type: ActionType,
    /// Human-readable label of the affected node or network.
    pub affected_node: String,
    pub actor_user_id: String,
    pub actor_email: String,
    pub change_note: String,
    #[serde(default)]
    pub before_snapshot: Option<ChangeSnapshot>,
    #[serde(default)]
    pub after_snapshot: Option<ChangeSnapshot>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notification_status: NotificationStatus,
    #[serde(default)]
    pub archived: bool,
}

// --- Optimizations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Planned,
    InProgress,
    Completed,
    Reverted,
}

impl OptimizationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OptimizationStatus::Planned => "Planned",
            OptimizationStatus::InProgress => "In Progress",
            OptimizationStatus::Completed => "Completed",
            OptimizationStatus::Reverted => "Reverted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectedScope {
    MoneySite,
    Domain,
    Path,
    WholeNetwork,
    SpecificDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedImpact {
    Ranking,
    Authority,
    Crawl,
    Conversion,
}

impl ExpectedImpact {
    pub fn label(&self) -> &'static str {
        match self {
            ExpectedImpact::Ranking => "Ranking",
            ExpectedImpact::Authority => "Authority",
            ExpectedImpact::Crawl => "Crawl",
            ExpectedImpact::Conversion => "Conversion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    None,
    Complained,
    UnderReview,
    Resolved,
}

/// Who performed an action. Snapshotted so records stay readable after user
/// churn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

impl ActorRef {
    pub fn system() -> Self {
        Self {
            user_id: "system".to_string(),
            email: "system@seonoc.local".to_string(),
            display_name: "System (Auto)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUrl {
    pub url: String,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub author: ActorRef,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Work-tracking record for a planned SEO intervention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Optimization {
    pub id: String,
    pub network_id: String,
    pub brand_id: String,
    pub title: String,
    pub description: String,
    pub reason_note: String,
    pub activity_type: String,
    pub affected_scope: AffectedScope,
    #[serde(default)]
    pub target_domains: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub report_urls: Vec<ReportUrl>,
    #[serde(default)]
    pub expected_impact: Vec<ExpectedImpact>,
    #[serde(default)]
    pub observed_impact: Option<String>,
    pub status: OptimizationStatus,
    #[serde(default)]
    pub complaint_status: ComplaintStatus,
    #[serde(default)]
    pub linked_conflict_id: Option<String>,
    #[serde(default)]
    pub priority: Option<Severity>,
    pub created_by: ActorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_by: Option<String>,
    #[serde(default)]
    pub last_reminder_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responses: Vec<TeamResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintState {
    Open,
    UnderReview,
    Resolved,
}

/// A complaint against one optimization, or (when `optimization_id` is None)
/// against the management of a whole network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub network_id: String,
    #[serde(default)]
    pub optimization_id: Option<String>,
    pub reason: String,
    pub priority: Severity,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub report_urls: Vec<String>,
    #[serde(default)]
    pub responsible_user_ids: Vec<String>,
    pub status: ComplaintState,
    pub created_by: ActorRef,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolution_note: Option<String>,
    #[serde(default)]
    pub time_to_resolution_hours: Option<f64>,
}

// --- Conflicts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    KeywordCannibalization,
    CompetingTargets,
    CanonicalMismatch,
    TierInversion,
    RedirectLoop,
    MultipleParentsToMain,
    IndexNoindexMismatch,
    CanonicalRedirectConflict,
    Orphan,
    NoindexHighTier,
}

impl ConflictType {
    pub fn label(&self) -> &'static str {
        match self {
            ConflictType::KeywordCannibalization => "Keyword Cannibalization",
            ConflictType::CompetingTargets => "Competing Targets",
            ConflictType::CanonicalMismatch => "Canonical Mismatch",
            ConflictType::TierInversion => "Tier Inversion",
            ConflictType::RedirectLoop => "Redirect Loop",
            ConflictType::MultipleParentsToMain => "Multiple Parents to Main",
            ConflictType::IndexNoindexMismatch => "Index/Noindex Mismatch",
            ConflictType::CanonicalRedirectConflict => "Canonical-Redirect Conflict",
            ConflictType::Orphan => "Orphan Node",
            ConflictType::NoindexHighTier => "Noindex High Tier",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::KeywordCannibalization => "keyword_cannibalization",
            ConflictType::CompetingTargets => "competing_targets",
            ConflictType::CanonicalMismatch => "canonical_mismatch",
            ConflictType::TierInversion => "tier_inversion",
            ConflictType::RedirectLoop => "redirect_loop",
            ConflictType::MultipleParentsToMain => "multiple_parents_to_main",
            ConflictType::IndexNoindexMismatch => "index_noindex_mismatch",
            ConflictType::CanonicalRedirectConflict => "canonical_redirect_conflict",
            ConflictType::Orphan => "orphan",
            ConflictType::NoindexHighTier => "noindex_high_tier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Detected,
    UnderReview,
    Resolved,
    Approved,
    Ignored,
}

impl ConflictStatus {
    /// A conflict in one of these states re-appearing in a detection run
    /// counts as a recurrence.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ConflictStatus::Resolved | ConflictStatus::Approved | ConflictStatus::Ignored
        )
    }
}

/// Stored structural conflict. Never deleted, only deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub id: String,
    pub network_id: String,
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub status: ConflictStatus,
    pub is_active: bool,
    /// Deterministic 32-hex structural identity; the dedup key across runs.
    pub fingerprint: String,
    pub node_a_id: String,
    pub node_a_label: String,
    #[serde(default)]
    pub node_b_id: Option<String>,
    #[serde(default)]
    pub node_b_label: Option<String>,
    #[serde(default)]
    pub domain_name: String,
    pub description: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub first_detected_at: DateTime<Utc>,
    #[serde(default)]
    pub last_recurrence_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurrence_count: u32,
    #[serde(default)]
    pub optimization_id: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default)]
    pub resolution_note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// --- Notification templates ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Telegram,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Telegram => "telegram",
            Channel::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SeoChange,
    SeoNetworkCreated,
    SeoOptimization,
    SeoOptimizationStatus,
    SeoComplaint,
    SeoProjectComplaint,
    SeoReminder,
    DomainExpiration,
    DomainDown,
    SeoNodeDeleted,
    Test,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SeoChange => "seo_change",
            EventType::SeoNetworkCreated => "seo_network_created",
            EventType::SeoOptimization => "seo_optimization",
            EventType::SeoOptimizationStatus => "seo_optimization_status",
            EventType::SeoComplaint => "seo_complaint",
            EventType::SeoProjectComplaint => "seo_project_complaint",
            EventType::SeoReminder => "seo_reminder",
            EventType::DomainExpiration => "domain_expiration",
            EventType::DomainDown => "domain_down",
            EventType::SeoNodeDeleted => "seo_node_deleted",
            EventType::Test => "test",
        }
    }

    /// Forum-topic family this event routes to, when topic routing is on.
    pub fn topic_family(&self) -> Option<TopicFamily> {
        match self {
            EventType::SeoChange
            | EventType::SeoNetworkCreated
            | EventType::SeoNodeDeleted
            | EventType::Test => Some(TopicFamily::SeoChange),
            EventType::SeoOptimization | EventType::SeoOptimizationStatus => {
                Some(TopicFamily::SeoOptimization)
            }
            EventType::SeoComplaint | EventType::SeoProjectComplaint => {
                Some(TopicFamily::SeoComplaint)
            }
            EventType::SeoReminder => Some(TopicFamily::SeoReminder),
            EventType::DomainExpiration | EventType::DomainDown => None,
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seo_change" => Ok(Self::SeoChange),
            "seo_network_created" => Ok(Self::SeoNetworkCreated),
            "seo_optimization" => Ok(Self::SeoOptimization),
            "seo_optimization_status" => Ok(Self::SeoOptimizationStatus),
            "seo_complaint" => Ok(Self::SeoComplaint),
            "seo_project_complaint" => Ok(Self::SeoProjectComplaint),
            "seo_reminder" => Ok(Self::SeoReminder),
            "domain_expiration" => Ok(Self::DomainExpiration),
            "domain_down" => Ok(Self::DomainDown),
            "seo_node_deleted" => Ok(Self::SeoNodeDeleted),
            "test" => Ok(Self::Test),
            other => Err(format!("unknown EventType: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicFamily {
    SeoChange,
    SeoOptimization,
    SeoComplaint,
    SeoReminder,
}

impl TopicFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicFamily::SeoChange => "seo_change",
            TopicFamily::SeoOptimization => "seo_optimization",
            TopicFamily::SeoComplaint => "seo_complaint",
            TopicFamily::SeoReminder => "seo_reminder",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub id: String,
    pub channel: Channel,
    pub event_type: EventType,
    pub title: String,
    pub template_body: String,
    pub default_template_body: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

// --- Audit log ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Append-only record of an actor-attributed privileged action. Distinct
/// from the SEO change ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub event_type: String,
    pub actor_email: String,
    pub resource: String,
    pub details: String,
    pub severity: AuditSeverity,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

// --- Test alerts (operator simulation, never touches real probe state) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestIssueType {
    Down,
    SoftBlocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestAlertRecord {
    pub id: String,
    pub domain: String,
    pub issue_type: TestIssueType,
    pub reason: String,
    pub severity: Severity,
    pub test_mode: bool,
    pub message_preview: String,
    pub actor_email: String,
    pub created_at: DateTime<Utc>,
}

// --- Scheduler state (cross-restart dedup keys for the workers) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerState {
    pub key: String,
    pub last_run_at: DateTime<Utc>,
}
