pub mod audit;
pub mod diff;
pub mod pipeline;

pub use audit::record_audit;
pub use diff::{classify_action, diff_snapshots, validate_change_note, validate_reason_note,
    validate_resolution_note};
pub use pipeline::{ChangePipeline, NewNetworkInput, NodeInput};
