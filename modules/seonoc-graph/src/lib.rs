pub mod conflicts;
pub mod enrich;
pub mod invariants;
pub mod snapshot;
pub mod testutil;
pub mod tiers;

pub use conflicts::{detect_conflicts, DetectedConflict};
pub use enrich::{enrich_domain, ImpactScore, SeoContext};
pub use snapshot::{format_node_with_status, structure_snapshot};
pub use tiers::{compute_tiers, TierMap};
