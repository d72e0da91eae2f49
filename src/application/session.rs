//! Page Session - 单个页面会话
//!
//! 一个会话对应一个浏览器标签页：持有一个 ViewController 与一个
//! PlaybackController，在单一任务中逐个处理客户端交互与播放后端事件，
//! 每个事件处理完才取下一个。

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::playback::{PlaybackController, PronunciationChain};
use crate::application::ports::{
    ActivationGesture, BindingTarget, PageEvent, PageSurfacePort, PlaybackEvent, PlaybackReporter,
    SentenceAudioPort,
};
use crate::application::view::{Binding, DeviceMode, ViewController};
use crate::domain::{Catalogue, TopicId};

/// 默认的发音反馈时长
pub const DEFAULT_FLASH: Duration = Duration::from_millis(500);

/// 客户端交互
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// 连接后的第一条消息，报告设备能力与当前主题
    Hello {
        touch: bool,
        #[serde(default)]
        topic_id: Option<TopicId>,
    },
    SelectTopic {
        topic_id: TopicId,
    },
    Activate {
        generation: u64,
        target: BindingTarget,
        index: usize,
        gesture: ActivationGesture,
    },
}

/// 会话事件队列中的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Interaction(Interaction),
    Playback(PlaybackEvent),
}

/// Page Session
pub struct PageSession {
    id: Uuid,
    catalogue: Arc<Catalogue>,
    surface: Arc<dyn PageSurfacePort>,
    view: Option<ViewController>,
    playback: PlaybackController,
    flash: Duration,
}

impl PageSession {
    /// 创建会话，返回播放后端事件的接收端
    pub fn new(
        catalogue: Arc<Catalogue>,
        surface: Arc<dyn PageSurfacePort>,
        audio: Box<dyn SentenceAudioPort>,
        pronunciation: Arc<PronunciationChain>,
        flash: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (reporter, playback_rx) = PlaybackReporter::channel();
        let playback = PlaybackController::new(audio, surface.clone(), pronunciation, reporter);
        let session = Self {
            id: Uuid::new_v4(),
            catalogue,
            surface,
            view: None,
            playback,
            flash,
        };
        (session, playback_rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn view(&self) -> Option<&ViewController> {
        self.view.as_ref()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// 处理一个事件（运行到完成）
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Playback(event) => self.playback.handle_event(event),
            SessionEvent::Interaction(interaction) => self.handle_interaction(interaction),
        }
    }

    /// 事件循环：交互通道关闭即结束，结束时停止句子播放
    pub async fn run(
        mut self,
        mut interactions: mpsc::Receiver<Interaction>,
        mut playback_events: mpsc::UnboundedReceiver<PlaybackEvent>,
    ) {
        tracing::info!(session_id = %self.id, "Page session started");

        loop {
            let event = tokio::select! {
                interaction = interactions.recv() => match interaction {
                    Some(interaction) => SessionEvent::Interaction(interaction),
                    None => break,
                },
                Some(event) = playback_events.recv() => SessionEvent::Playback(event),
            };
            self.handle(event);
        }

        self.playback.shutdown();
        tracing::info!(session_id = %self.id, "Page session closed");
    }

    fn handle_interaction(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::Hello { touch, topic_id } => self.hello(touch, topic_id),
            Interaction::SelectTopic { topic_id } => match self.view.as_mut() {
                Some(view) => {
                    view.select_topic(topic_id);
                }
                None => tracing::debug!(session_id = %self.id, "SelectTopic before hello ignored"),
            },
            Interaction::Activate {
                generation,
                target,
                index,
                gesture,
            } => self.activate(generation, target, index, gesture),
        }
    }

    fn hello(&mut self, touch: bool, topic_id: Option<TopicId>) {
        if self.view.is_some() {
            tracing::debug!(session_id = %self.id, "Device mode already fixed, hello ignored");
            return;
        }

        let mode = DeviceMode::detect(touch);
        tracing::info!(session_id = %self.id, mode = ?mode, "Device mode detected");

        let mut view = ViewController::new(self.catalogue.clone(), self.surface.clone(), mode);
        view.announce();
        view.select_initial(topic_id);
        self.view = Some(view);
    }

    fn activate(
        &mut self,
        generation: u64,
        target: BindingTarget,
        index: usize,
        gesture: ActivationGesture,
    ) {
        let Some(view) = self.view.as_ref() else {
            tracing::debug!(session_id = %self.id, "Activation before hello ignored");
            return;
        };
        let Some(binding) = view
            .bindings()
            .resolve(generation, target, index, gesture)
            .cloned()
        else {
            return;
        };

        match binding {
            Binding::PlaySentence {
                sentence_id,
                control,
            } => self.playback.request_sentence(sentence_id, control),
            Binding::PronounceWord { word } => {
                if self.playback.request_word(&word).is_none() {
                    return;
                }
                if let Some(class) = target.flash_class() {
                    self.surface.apply(PageEvent::Flash {
                        generation,
                        target,
                        index,
                        class,
                        duration_ms: self.flash.as_millis() as u64,
                    });
                }
            }
            Binding::ToggleGrammar { sentence_id } => {
                tracing::debug!(sentence_id, "Grammar notes toggled");
                self.surface
                    .apply(PageEvent::GrammarToggled { generation, index });
            }
        }
    }
}
