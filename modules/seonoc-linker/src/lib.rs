pub mod fingerprint;
pub mod linker;
pub mod messages;

pub use fingerprint::conflict_fingerprint;
pub use linker::{ConflictLinker, LinkerSummary};
