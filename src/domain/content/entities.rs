//! Content Context - Entities
//!
//! 主题、句子、词汇条目。字段名与原始数据文件保持一致（`english`/`chinese` 等），
//! 可选字段缺失时退化为空值而不是报错。

use serde::{Deserialize, Serialize};

/// 主题 ID
pub type TopicId = u32;

/// 句子 ID（同时作为音频文件名）
pub type SentenceId = u32;

/// 主题 - 一组有序句子的命名分组
///
/// 不变量:
/// - id 在目录内唯一
/// - sentence_ids 中无法解析的 ID 在渲染时静默跳过
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    #[serde(default)]
    pub sentence_ids: Vec<SentenceId>,
}

impl Topic {
    /// 声明的句子数量（原样计数，不考虑能否解析）
    pub fn declared_len(&self) -> usize {
        self.sentence_ids.len()
    }
}

/// 词汇类别，只影响样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordKind {
    Core,
    Topic,
}

impl WordKind {
    pub fn card_class(self) -> &'static str {
        match self {
            WordKind::Core => "core-word-card",
            WordKind::Topic => "topic-word-card",
        }
    }
}

/// 词汇条目（核心词汇与主题词汇共用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub collocations: Vec<String>,
    #[serde(default)]
    pub memory: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub comparison: Option<String>,
}

/// 例句
///
/// 不变量:
/// - 语法区块当且仅当 grammar_title 非空时存在
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: SentenceId,
    /// 英文原句
    #[serde(rename = "english")]
    pub source_text: String,
    /// 中文翻译
    #[serde(rename = "chinese", default)]
    pub translation: String,
    #[serde(default)]
    pub core_words: Vec<Word>,
    #[serde(default)]
    pub topic_words: Vec<Word>,
    #[serde(default)]
    pub grammar_title: Option<String>,
    #[serde(default)]
    pub grammar_notes: Vec<String>,
}

impl Sentence {
    /// 非空的语法标题
    pub fn grammar_title(&self) -> Option<&str> {
        self.grammar_title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_grammar(&self) -> bool {
        self.grammar_title().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_from_data_file_field_names() {
        let json = r#"{
            "id": 7,
            "english": "I don't know.",
            "chinese": "我不知道。",
            "core_words": [{"word": "know", "phonetic": "nəʊ", "definition": "v. 知道"}],
            "topic_words": [],
            "grammar_title": "",
            "grammar_notes": []
        }"#;
        let sentence: Sentence = serde_json::from_str(json).unwrap();
        assert_eq!(sentence.id, 7);
        assert_eq!(sentence.source_text, "I don't know.");
        assert_eq!(sentence.translation, "我不知道。");
        assert_eq!(sentence.core_words.len(), 1);
        assert!(sentence.core_words[0].collocations.is_empty());
        assert!(!sentence.has_grammar());
    }

    #[test]
    fn test_missing_optional_fields_degrade_to_empty() {
        let sentence: Sentence = serde_json::from_str(r#"{"id": 1, "english": "Hi."}"#).unwrap();
        assert!(sentence.translation.is_empty());
        assert!(sentence.core_words.is_empty());
        assert!(sentence.grammar_title().is_none());
    }

    #[test]
    fn test_word_kind_class() {
        assert_eq!(WordKind::Core.card_class(), "core-word-card");
        assert_eq!(WordKind::Topic.card_class(), "topic-word-card");
    }
}
