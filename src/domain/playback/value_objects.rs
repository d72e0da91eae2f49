//! Playback Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::content::SentenceId;

/// 句子音频所在的相对目录
pub const SENTENCE_AUDIO_DIR: &str = "audio";

/// 句子音频扩展名
pub const SENTENCE_AUDIO_EXT: &str = "mp3";

/// 单词发音回退时使用的语言标签
pub const FALLBACK_LANGUAGE: &str = "en-US";

/// 单词发音回退时的语速（相对正常语速）
pub const FALLBACK_RATE: f32 = 0.9;

/// 句子音频资源
///
/// 文件名为至少 3 位补零的句子 ID，例如 7 → `007.mp3`，1234 → `1234.mp3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceAudio {
    file_name: String,
}

impl SentenceAudio {
    pub fn for_sentence(sentence_id: SentenceId) -> Self {
        Self {
            file_name: format!("{:03}.{}", sentence_id, SENTENCE_AUDIO_EXT),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 相对页面根目录的路径，如 `audio/007.mp3`
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(SENTENCE_AUDIO_DIR).join(&self.file_name)
    }
}

/// 规范化后的单词（非空、小写）
///
/// 只保留 ASCII 字母、空白、连字符和撇号，去掉首尾空白
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedWord(String);

impl NormalizedWord {
    pub fn parse(surface: &str) -> Option<Self> {
        let kept: String = surface
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace() || *c == '-' || *c == '\'')
            .collect();
        let normalized = kept.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 语音合成请求
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
    pub rate: f32,
}

impl Utterance {
    /// 单词发音回退：en-US，略慢语速
    pub fn for_word(word: &NormalizedWord) -> Self {
        Self {
            text: word.as_str().to_string(),
            language: FALLBACK_LANGUAGE.to_string(),
            rate: FALLBACK_RATE,
        }
    }
}

/// 播放控件标识
///
/// 控件随每次渲染重建，因此由渲染代次 + 控件序号共同确定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId {
    pub generation: u64,
    pub slot: usize,
}

impl ControlId {
    pub fn new(generation: u64, slot: usize) -> Self {
        Self { generation, slot }
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}-{}", self.generation, self.slot)
    }
}

/// 单次句子音频播放的票据，用于识别过期的后端事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackTicket(u64);

impl PlaybackTicket {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlaybackTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_audio_zero_padded() {
        assert_eq!(SentenceAudio::for_sentence(7).file_name(), "007.mp3");
        assert_eq!(SentenceAudio::for_sentence(42).file_name(), "042.mp3");
        assert_eq!(SentenceAudio::for_sentence(100).file_name(), "100.mp3");
        assert_eq!(SentenceAudio::for_sentence(1234).file_name(), "1234.mp3");
        assert_eq!(
            SentenceAudio::for_sentence(7).relative_path(),
            PathBuf::from("audio/007.mp3")
        );
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(NormalizedWord::parse(" Run-Fast! ").unwrap().as_str(), "run-fast");
        assert_eq!(NormalizedWord::parse("Don't").unwrap().as_str(), "don't");
        assert_eq!(NormalizedWord::parse("ice cream.").unwrap().as_str(), "ice cream");
        assert_eq!(NormalizedWord::parse("café").unwrap().as_str(), "caf");
    }

    #[test]
    fn test_normalize_empty_results() {
        assert!(NormalizedWord::parse("123").is_none());
        assert!(NormalizedWord::parse("").is_none());
        assert!(NormalizedWord::parse(" !? ").is_none());
    }

    #[test]
    fn test_utterance_for_word() {
        let word = NormalizedWord::parse("Hello").unwrap();
        let utterance = Utterance::for_word(&word);
        assert_eq!(utterance.text, "hello");
        assert_eq!(utterance.language, "en-US");
        assert!((utterance.rate - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ticket_sequence() {
        let first = PlaybackTicket::new(1);
        assert_eq!(first.next().value(), 2);
        assert_eq!(ControlId::new(3, 1).to_string(), "g3-1");
    }
}
