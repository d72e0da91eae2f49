//! Sentence Audio Port - 句子音频播放抽象
//!
//! 播放是异步的：`start` 立即返回，启动成功/失败、自然结束、播放中出错
//! 都通过 `PlaybackReporter` 以事件形式回到会话事件循环。

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::playback::{PlaybackTicket, SentenceAudio};

/// 播放错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Audio resource not found: {0}")]
    NotFound(String),

    #[error("Failed to start player: {0}")]
    SpawnFailed(String),

    #[error("Player exited abnormally: {0}")]
    Exited(String),

    #[error("Playback backend error: {0}")]
    Backend(String),
}

/// 播放后端事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// 开始播放
    Started(PlaybackTicket),
    /// 启动失败（资源缺失、解码错误等）
    StartFailed {
        ticket: PlaybackTicket,
        error: PlaybackError,
    },
    /// 自然播放结束
    Ended(PlaybackTicket),
    /// 播放过程中出错
    Failed {
        ticket: PlaybackTicket,
        error: PlaybackError,
    },
}

impl PlaybackEvent {
    pub fn ticket(&self) -> PlaybackTicket {
        match self {
            PlaybackEvent::Started(ticket) | PlaybackEvent::Ended(ticket) => *ticket,
            PlaybackEvent::StartFailed { ticket, .. } | PlaybackEvent::Failed { ticket, .. } => {
                *ticket
            }
        }
    }
}

/// 播放事件回报通道
#[derive(Debug, Clone)]
pub struct PlaybackReporter {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackReporter {
    pub fn new(tx: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self { tx }
    }

    /// 创建回报通道及其接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn report(&self, event: PlaybackEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Playback event dropped, session already closed");
        }
    }
}

/// Sentence Audio Port
///
/// 单一句子音频资源的持有者，每个页面会话独占一个实例
pub trait SentenceAudioPort: Send + Sync {
    /// 加载并开始播放，取代任何正在进行的播放
    fn start(&self, ticket: PlaybackTicket, audio: &SentenceAudio, reporter: PlaybackReporter);

    /// 停止当前播放（被停止的播放不再回报事件）
    fn stop(&self);
}
