//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Content Context: 主题、句子、词汇与句子索引
//! - Playback Context: 音频资源命名、单词规范化、播放控件标识
//!
//! 以及共享的页面片段渲染（纯函数）

pub mod content;
pub mod markup;
pub mod playback;

pub use content::{Catalogue, ContentIndex, Sentence, SentenceId, Topic, TopicId, Word, WordKind};
