pub mod config;
pub mod error;
pub mod paths;
pub mod settings;
pub mod throttle;
pub mod types;

pub use config::Config;
pub use error::{NocError, NocResult};
pub use paths::{node_label, normalize_path};
pub use throttle::Throttle;
pub use types::*;
