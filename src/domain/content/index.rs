//! Content Index
//!
//! 句子 ID → 句子记录的只读映射，启动时构建一次

use std::collections::HashMap;

use super::entities::{Sentence, SentenceId, Topic, TopicId};

/// 句子索引
///
/// 重复 ID 后写覆盖前写，不报错
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    sentences: HashMap<SentenceId, Sentence>,
}

impl ContentIndex {
    pub fn build(sentences: impl IntoIterator<Item = Sentence>) -> Self {
        let sentences = sentences.into_iter().map(|s| (s.id, s)).collect();
        Self { sentences }
    }

    pub fn lookup(&self, id: SentenceId) -> Option<&Sentence> {
        self.sentences.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// 内容目录 - 主题列表 + 句子索引
///
/// 由应用根持有，通过 `Arc` 只读共享给各会话
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    topics: Vec<Topic>,
    index: ContentIndex,
}

impl Catalogue {
    pub fn new(topics: Vec<Topic>, sentences: Vec<Sentence>) -> Self {
        Self {
            topics,
            index: ContentIndex::build(sentences),
        }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn first_topic(&self) -> Option<&Topic> {
        self.topics.first()
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// 按主题声明顺序解析句子，跳过无法解析的 ID
    pub fn resolve_sentences<'a>(
        &'a self,
        topic: &'a Topic,
    ) -> impl Iterator<Item = &'a Sentence> + 'a {
        topic.sentence_ids.iter().filter_map(move |id| {
            let sentence = self.index.lookup(*id);
            if sentence.is_none() {
                tracing::debug!(
                    topic_id = topic.id,
                    sentence_id = id,
                    "Sentence not in index, skipped"
                );
            }
            sentence
        })
    }
}
