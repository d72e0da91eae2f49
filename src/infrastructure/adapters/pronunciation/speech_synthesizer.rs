//! Speech Synthesizer - 本机语音合成发音（回退策略）
//!
//! 调用 espeak-ng 兼容的合成器：`<program> -v <voice> -s <wpm> -- <text>`。
//! 找不到合成器程序视为能力不可用，由策略链静默跳过。

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{PronunciationError, PronunciationStrategy};
use crate::domain::playback::{NormalizedWord, Utterance};
use crate::infrastructure::adapters::audio::exit_result;

/// 语音合成配置
#[derive(Debug, Clone)]
pub struct SpeechSynthesizerConfig {
    pub program: String,
    /// 正常语速（每分钟词数）
    pub words_per_minute: u32,
}

impl Default for SpeechSynthesizerConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".to_string(),
            words_per_minute: 175,
        }
    }
}

/// 语音合成发音策略
pub struct SpeechSynthesizer {
    config: SpeechSynthesizerConfig,
}

impl SpeechSynthesizer {
    pub fn new(config: SpeechSynthesizerConfig) -> Self {
        Self { config }
    }

    /// 合成器参数
    pub fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = (self.config.words_per_minute as f32 * utterance.rate).round() as u32;
        vec![
            "-v".to_string(),
            utterance.language.to_ascii_lowercase(),
            "-s".to_string(),
            wpm.max(1).to_string(),
            "--".to_string(),
            utterance.text.clone(),
        ]
    }
}

#[async_trait]
impl PronunciationStrategy for SpeechSynthesizer {
    fn name(&self) -> &'static str {
        "speech_synthesizer"
    }

    async fn pronounce(&self, word: &NormalizedWord) -> Result<(), PronunciationError> {
        let utterance = Utterance::for_word(word);

        let mut child = Command::new(&self.config.program)
            .args(self.args_for(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    PronunciationError::Unavailable(format!("{}: {}", self.config.program, e))
                }
                _ => PronunciationError::PlaybackError(e.to_string()),
            })?;

        tracing::debug!(word = %word, language = %utterance.language, "Speaking word");

        tokio::spawn(async move {
            if let Err(e) = exit_result(child.wait().await) {
                tracing::warn!(error = %e, "Speech synthesis failed");
            }
        });

        Ok(())
    }
}
