//! 应用层 - 查询（读操作）
//!
//! 无状态的只读查询，供 HTTP 接口直接返回渲染结果

mod topic_queries;

pub mod handlers;

pub use topic_queries::*;
