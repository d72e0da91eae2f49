//! Application State
//!
//! 所有页面会话共享的只读状态

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    GetTopicFragmentHandler, ListTopicsHandler, PronunciationChain, SentenceAudioPort,
};
use crate::domain::Catalogue;

/// 为每个页面会话创建独占的句子音频资源
pub type SentenceAudioFactory = Arc<dyn Fn() -> Box<dyn SentenceAudioPort> + Send + Sync>;

/// 应用状态
pub struct AppState {
    // ========== Shared ==========
    pub catalogue: Arc<Catalogue>,
    pub pronunciation: Arc<PronunciationChain>,
    pub sentence_audio: SentenceAudioFactory,
    pub flash: Duration,

    // ========== Query Handlers ==========
    pub list_topics_handler: ListTopicsHandler,
    pub get_topic_fragment_handler: GetTopicFragmentHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        catalogue: Arc<Catalogue>,
        pronunciation: Arc<PronunciationChain>,
        sentence_audio: SentenceAudioFactory,
        flash: Duration,
    ) -> Self {
        Self {
            catalogue: catalogue.clone(),
            pronunciation,
            sentence_audio,
            flash,

            list_topics_handler: ListTopicsHandler::new(catalogue.clone()),
            get_topic_fragment_handler: GetTopicFragmentHandler::new(catalogue),
        }
    }
}
