//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SentenceAudio、PronunciationStrategy、PageSurface）
//! - playback: 播放控制器与单词发音策略链
//! - view: 主题切换、渲染与交互绑定
//! - session: 页面会话事件循环
//! - queries: 只读查询及处理器
//! - error: 应用层错误定义

pub mod error;
pub mod playback;
pub mod ports;
pub mod queries;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;

pub use playback::{PlaybackController, PronunciationChain, SentenceState};
pub use session::{Interaction, PageSession, SessionEvent, DEFAULT_FLASH};
pub use view::{render_sentence_list, Binding, BindingTable, DeviceMode, ViewController};

pub use ports::{
    ActivationGesture, BindingDescriptor, BindingTarget, PageEvent, PageSurfacePort,
    PlaybackError, PlaybackEvent, PlaybackReporter, PronunciationError, PronunciationStrategy,
    SentenceAudioPort,
};

pub use queries::{
    // Topic queries
    GetTopicFragment,
    ListTopics,
    // Handlers
    handlers::{GetTopicFragmentHandler, ListTopicsHandler, TopicFragment, TopicSummary},
};
