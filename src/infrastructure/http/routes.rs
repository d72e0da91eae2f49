//! HTTP Routes
//!
//! Endpoints:
//! - /                      GET   页面（导航 + 第一个主题）
//! - /api/ping              GET   健康检查
//! - /api/topics            GET   主题列表
//! - /api/topics/:topic_id  GET   主题句子片段
//! - /ws/page               WS    页面会话

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api_routes())
        .route("/ws/page", get(handlers::page_socket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/topics", get(handlers::list_topics))
        .route("/topics/:topic_id", get(handlers::get_topic))
}
