//! Playback Controller - 播放控制
//!
//! 两个互不干扰的通道:
//! - 句子音频：Idle / Starting / Playing，任何时刻至多一个控件带 "playing" 标记
//! - 单词发音：无状态，按策略列表依次尝试，发出后不可取消
//!
//! 所有状态迁移都在会话事件循环内同步完成；后端的启动结果与结束事件
//! 通过 `handle_event` 回到这里，票据不匹配的事件视为过期直接忽略。

use std::sync::Arc;

use crate::application::ports::{
    PageEvent, PageSurfacePort, PlaybackEvent, PlaybackReporter, PronunciationError,
    PronunciationStrategy, SentenceAudioPort,
};
use crate::domain::playback::{ControlId, NormalizedWord, PlaybackTicket, SentenceAudio};
use crate::domain::SentenceId;

/// 句子音频通道状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceState {
    Idle,
    /// 已请求播放，等待后端确认（尚未标记控件）
    Starting {
        ticket: PlaybackTicket,
        control: ControlId,
    },
    Playing {
        ticket: PlaybackTicket,
        control: ControlId,
    },
}

/// 单词发音策略链
pub struct PronunciationChain {
    strategies: Vec<Arc<dyn PronunciationStrategy>>,
}

impl PronunciationChain {
    pub fn new(strategies: Vec<Arc<dyn PronunciationStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// 依次尝试各策略，返回成功开始播放的策略名
    pub async fn pronounce(&self, word: &NormalizedWord) -> Option<&'static str> {
        for strategy in &self.strategies {
            match strategy.pronounce(word).await {
                Ok(()) => {
                    tracing::debug!(strategy = strategy.name(), word = %word, "Word pronounced");
                    return Some(strategy.name());
                }
                Err(PronunciationError::Unavailable(reason)) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        reason = %reason,
                        "Strategy unavailable"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        word = %word,
                        error = %e,
                        "Pronunciation failed, trying next strategy"
                    );
                }
            }
        }
        tracing::debug!(word = %word, "No pronunciation strategy produced audio");
        None
    }
}

/// 播放控制器
///
/// 独占会话的句子音频资源
pub struct PlaybackController {
    audio: Box<dyn SentenceAudioPort>,
    surface: Arc<dyn PageSurfacePort>,
    pronunciation: Arc<PronunciationChain>,
    reporter: PlaybackReporter,
    state: SentenceState,
    last_ticket: PlaybackTicket,
}

impl PlaybackController {
    pub fn new(
        audio: Box<dyn SentenceAudioPort>,
        surface: Arc<dyn PageSurfacePort>,
        pronunciation: Arc<PronunciationChain>,
        reporter: PlaybackReporter,
    ) -> Self {
        Self {
            audio,
            surface,
            pronunciation,
            reporter,
            state: SentenceState::Idle,
            last_ticket: PlaybackTicket::new(0),
        }
    }

    pub fn state(&self) -> SentenceState {
        self.state
    }

    /// 当前带 "playing" 标记的控件
    pub fn active_control(&self) -> Option<ControlId> {
        match self.state {
            SentenceState::Playing { control, .. } => Some(control),
            _ => None,
        }
    }

    /// 请求播放句子音频
    ///
    /// 对正在播放的同一控件再次请求 = 停止（不是暂停后续播）；
    /// 其他情况先停掉当前播放，再开始新的播放。
    pub fn request_sentence(&mut self, sentence_id: SentenceId, control: ControlId) {
        if let SentenceState::Playing { control: active, .. } = self.state {
            if active == control {
                tracing::debug!(control = %control, sentence_id, "Sentence playback toggled off");
                self.audio.stop();
                self.finish(active);
                return;
            }
        }

        self.halt();

        let audio = SentenceAudio::for_sentence(sentence_id);
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.state = SentenceState::Starting { ticket, control };

        tracing::debug!(
            ticket = %ticket,
            control = %control,
            file = audio.file_name(),
            "Starting sentence audio"
        );
        self.audio.start(ticket, &audio, self.reporter.clone());
    }

    /// 处理播放后端事件
    pub fn handle_event(&mut self, event: PlaybackEvent) {
        let ticket = event.ticket();
        match (self.state, event) {
            (SentenceState::Starting { ticket: current, control }, PlaybackEvent::Started(_))
                if current == ticket =>
            {
                self.state = SentenceState::Playing { ticket, control };
                self.set_marker(control, true);
                tracing::info!(ticket = %ticket, control = %control, "Sentence audio playing");
            }
            (
                SentenceState::Starting {
                    ticket: current,
                    control,
                },
                PlaybackEvent::StartFailed { error, .. },
            ) if current == ticket => {
                self.state = SentenceState::Idle;
                tracing::warn!(
                    ticket = %ticket,
                    control = %control,
                    error = %error,
                    "Sentence audio failed to start"
                );
            }
            (SentenceState::Starting { ticket: current, .. }, PlaybackEvent::Ended(_))
                if current == ticket =>
            {
                self.state = SentenceState::Idle;
            }
            (SentenceState::Starting { ticket: current, .. }, PlaybackEvent::Failed { error, .. })
                if current == ticket =>
            {
                self.state = SentenceState::Idle;
                tracing::warn!(ticket = %ticket, error = %error, "Sentence audio failed");
            }
            (SentenceState::Playing { ticket: current, control }, PlaybackEvent::Ended(_))
                if current == ticket =>
            {
                tracing::debug!(ticket = %ticket, control = %control, "Sentence audio ended");
                self.finish(control);
            }
            (
                SentenceState::Playing {
                    ticket: current,
                    control,
                },
                PlaybackEvent::Failed { error, .. },
            ) if current == ticket => {
                tracing::warn!(
                    ticket = %ticket,
                    control = %control,
                    error = %error,
                    "Sentence audio error during playback"
                );
                self.finish(control);
            }
            (_, event) => {
                tracing::debug!(ticket = %ticket, event = ?event, "Stale playback event ignored");
            }
        }
    }

    /// 请求单词发音，返回实际派发的规范化单词
    ///
    /// 必须在 tokio 运行时内调用；发音任务独立运行，与句子音频互不影响
    pub fn request_word(&self, surface_form: &str) -> Option<NormalizedWord> {
        let Some(word) = NormalizedWord::parse(surface_form) else {
            tracing::debug!(surface_form, "Nothing to pronounce after normalization");
            return None;
        };

        let chain = self.pronunciation.clone();
        let dispatched = word.clone();
        tokio::spawn(async move {
            chain.pronounce(&word).await;
        });
        Some(dispatched)
    }

    /// 停止一切句子播放（会话结束时调用）
    pub fn shutdown(&mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        match self.state {
            SentenceState::Idle => {}
            SentenceState::Starting { ticket, .. } => {
                tracing::debug!(ticket = %ticket, "Cancelling pending sentence audio");
                self.audio.stop();
                self.state = SentenceState::Idle;
            }
            SentenceState::Playing { ticket, control } => {
                tracing::debug!(
                    ticket = %ticket,
                    control = %control,
                    "Stopping previous sentence audio"
                );
                self.audio.stop();
                self.finish(control);
            }
        }
    }

    fn finish(&mut self, control: ControlId) {
        self.state = SentenceState::Idle;
        self.set_marker(control, false);
    }

    fn set_marker(&self, control: ControlId, playing: bool) {
        self.surface.apply(PageEvent::PlayingMarker { control, playing });
    }
}
