//! Topic Query Handlers

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::queries::{GetTopicFragment, ListTopics};
use crate::application::view::render_sentence_list;
use crate::domain::markup::progress_label;
use crate::domain::{Catalogue, Topic, TopicId};

// ============================================================================
// Response DTOs
// ============================================================================

/// 主题摘要
#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub id: TopicId,
    pub name: String,
    pub declared_sentences: usize,
    pub available_sentences: usize,
}

impl TopicSummary {
    fn from_topic(catalogue: &Catalogue, topic: &Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name.clone(),
            declared_sentences: topic.declared_len(),
            available_sentences: catalogue.resolve_sentences(topic).count(),
        }
    }
}

/// 主题片段：标题、进度与渲染好的句子列表
#[derive(Debug, Clone, Serialize)]
pub struct TopicFragment {
    pub id: TopicId,
    pub title: String,
    pub progress: String,
    pub html: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListTopics Handler
pub struct ListTopicsHandler {
    catalogue: Arc<Catalogue>,
}

impl ListTopicsHandler {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self { catalogue }
    }

    pub fn handle(&self, _query: ListTopics) -> Vec<TopicSummary> {
        self.catalogue
            .topics()
            .iter()
            .map(|topic| TopicSummary::from_topic(&self.catalogue, topic))
            .collect()
    }
}

/// GetTopicFragment Handler
pub struct GetTopicFragmentHandler {
    catalogue: Arc<Catalogue>,
}

impl GetTopicFragmentHandler {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self { catalogue }
    }

    pub fn handle(&self, query: GetTopicFragment) -> Result<TopicFragment, ApplicationError> {
        let topic = self
            .catalogue
            .topic(query.topic_id)
            .ok_or_else(|| ApplicationError::not_found("Topic", query.topic_id))?;

        Ok(TopicFragment {
            id: topic.id,
            title: topic.name.clone(),
            progress: progress_label(topic),
            html: render_sentence_list(&self.catalogue, topic),
        })
    }
}
