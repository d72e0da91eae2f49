//! Pronunciation Adapter - 单词发音策略实现

mod remote_dictionary;
mod speech_synthesizer;

pub use remote_dictionary::{RemoteDictionaryConfig, RemoteDictionaryPronouncer};
pub use speech_synthesizer::{SpeechSynthesizer, SpeechSynthesizerConfig};
