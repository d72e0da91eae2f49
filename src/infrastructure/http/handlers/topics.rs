//! Topic Handlers
//!
//! 无会话的只读接口，返回与页面会话相同的渲染片段

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetTopicFragment, ListTopics, TopicFragment, TopicSummary};
use crate::domain::TopicId;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取主题列表
pub async fn list_topics(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<TopicSummary>>> {
    Json(ApiResponse::success(state.list_topics_handler.handle(ListTopics)))
}

/// 获取主题的句子片段
pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    topic_id: Result<Path<TopicId>, PathRejection>,
) -> Result<Json<ApiResponse<TopicFragment>>, ApiError> {
    let Path(topic_id) = topic_id?;
    let fragment = state
        .get_topic_fragment_handler
        .handle(GetTopicFragment { topic_id })?;
    Ok(Json(ApiResponse::success(fragment)))
}
