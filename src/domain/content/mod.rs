//! Content Context - 学习内容限界上下文
//!
//! 职责:
//! - 主题 / 句子 / 词汇实体
//! - 句子索引（启动时构建，之后只读）

mod entities;
mod index;

pub use entities::{Sentence, SentenceId, Topic, TopicId, Word, WordKind};
pub use index::{Catalogue, ContentIndex};
