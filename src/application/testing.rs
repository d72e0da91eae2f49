//! 应用层测试替身

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::{
    PageEvent, PageSurfacePort, PlaybackReporter, PronunciationError, PronunciationStrategy,
    SentenceAudioPort,
};
use crate::domain::playback::{ControlId, NormalizedWord, PlaybackTicket, SentenceAudio};

/// 记录所有页面事件
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<PageEvent>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<PageEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// 按事件重放得到当前带 "playing" 标记的控件
    pub fn active_markers(&self) -> Vec<ControlId> {
        let mut active: Vec<ControlId> = Vec::new();
        for event in self.events.lock().unwrap().iter() {
            if let PageEvent::PlayingMarker { control, playing } = event {
                active.retain(|c| c != control);
                if *playing {
                    active.push(*control);
                }
            }
        }
        active
    }

    /// 最近一次 SentencesReplaced 的代次
    pub fn last_generation(&self) -> Option<u64> {
        self.events.lock().unwrap().iter().rev().find_map(|e| match e {
            PageEvent::SentencesReplaced { generation, .. } => Some(*generation),
            _ => None,
        })
    }

    /// 最近一次 SentencesReplaced 的 HTML
    pub fn last_html(&self) -> Option<String> {
        self.events.lock().unwrap().iter().rev().find_map(|e| match e {
            PageEvent::SentencesReplaced { html, .. } => Some(html.clone()),
            _ => None,
        })
    }
}

impl PageSurfacePort for RecordingSurface {
    fn apply(&self, event: PageEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    Start { ticket: PlaybackTicket, file: String },
    Stop,
}

/// 只记录调用，不回报任何事件；测试自行驱动 handle_event
pub struct FakeSentenceAudio {
    calls: Arc<Mutex<Vec<AudioCall>>>,
}

impl FakeSentenceAudio {
    pub fn new() -> (Self, Arc<Mutex<Vec<AudioCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl SentenceAudioPort for FakeSentenceAudio {
    fn start(&self, ticket: PlaybackTicket, audio: &SentenceAudio, _reporter: PlaybackReporter) {
        self.calls.lock().unwrap().push(AudioCall::Start {
            ticket,
            file: audio.file_name().to_string(),
        });
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push(AudioCall::Stop);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Succeed,
    Fail,
    Unavailable,
}

/// 按预设结果返回的发音策略
pub struct ScriptedStrategy {
    name: &'static str,
    outcome: Outcome,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedStrategy {
    pub fn new(name: &'static str, outcome: Outcome) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                name,
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl PronunciationStrategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn pronounce(&self, word: &NormalizedWord) -> Result<(), PronunciationError> {
        self.calls.lock().unwrap().push(word.as_str().to_string());
        match self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(PronunciationError::ServiceError("scripted failure".into())),
            Outcome::Unavailable => Err(PronunciationError::Unavailable("scripted".into())),
        }
    }
}
