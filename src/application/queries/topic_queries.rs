//! Topic Queries

use crate::domain::TopicId;

/// 列出所有主题查询
#[derive(Debug, Clone)]
pub struct ListTopics;

/// 获取主题句子片段查询
#[derive(Debug, Clone)]
pub struct GetTopicFragment {
    pub topic_id: TopicId,
}
