pub mod audit;
pub mod brands;
pub mod change_logs;
pub mod client;
pub mod complaints;
pub mod conflicts;
pub mod domains;
pub mod entries;
pub mod indexes;
pub mod networks;
pub mod optimizations;
pub mod scheduler_state;
pub mod settings;
pub mod templates;
pub mod test_alerts;

pub use audit::AuditRepo;
pub use brands::BrandRepo;
pub use change_logs::ChangeLogRepo;
pub use client::StoreClient;
pub use complaints::ComplaintRepo;
pub use conflicts::ConflictRepo;
pub use domains::DomainRepo;
pub use entries::EntryRepo;
pub use networks::NetworkRepo;
pub use optimizations::OptimizationRepo;
pub use scheduler_state::SchedulerStateRepo;
pub use settings::SettingsRepo;
pub use templates::TemplateRepo;
pub use test_alerts::TestAlertRepo;
