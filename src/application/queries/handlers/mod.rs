//! Query Handlers 实现

mod topic_handlers;

pub use topic_handlers::*;
