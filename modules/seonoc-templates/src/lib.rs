pub mod context;
pub mod defaults;
pub mod engine;
pub mod vars;

pub use context::ContextBuilder;
pub use engine::{render, validate, TemplateStore};
pub use vars::ALLOWED_VARIABLES;
