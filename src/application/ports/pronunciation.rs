//! Pronunciation Port - 单词发音策略抽象
//!
//! 单词发音按有序策略列表依次尝试（远程词典 → 本机语音合成），
//! 第一个成功开始播放的策略即结束本次请求。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::playback::NormalizedWord;

/// 发音错误
#[derive(Debug, Error)]
pub enum PronunciationError {
    /// 运行环境不具备该能力（静默跳过）
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),
}

/// Pronunciation Strategy
#[async_trait]
pub trait PronunciationStrategy: Send + Sync {
    /// 策略名（用于日志）
    fn name(&self) -> &'static str;

    /// 播放单词发音，开始播放即返回 Ok
    async fn pronounce(&self, word: &NormalizedWord) -> Result<(), PronunciationError>;
}
