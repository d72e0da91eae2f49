//! Ping Handler
//!
//! 健康检查

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub topics: usize,
    pub sentences: usize,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        topics: state.catalogue.topics().len(),
        sentences: state.catalogue.index().len(),
    })
}
