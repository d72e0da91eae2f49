//! Playback Context - 音频播放限界上下文
//!
//! 职责:
//! - 句子音频资源命名
//! - 单词规范化与语音合成请求
//! - 播放控件与播放票据标识

mod value_objects;

pub use value_objects::{
    ControlId, NormalizedWord, PlaybackTicket, SentenceAudio, Utterance, FALLBACK_LANGUAGE,
    FALLBACK_RATE, SENTENCE_AUDIO_DIR, SENTENCE_AUDIO_EXT,
};
