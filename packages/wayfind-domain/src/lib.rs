pub mod context;
pub mod path;
pub mod qid;
pub mod redirect;

pub use context::{ContextRules, Scope};
pub use qid::QueryId;
