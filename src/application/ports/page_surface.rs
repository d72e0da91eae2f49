//! Page Surface Port - 页面展示面抽象
//!
//! 视图控制器与播放控制器对页面的所有修改都以 `PageEvent` 形式交给展示面，
//! 具体实现可以推送到浏览器（WebSocket）或记录为快照。

use serde::{Deserialize, Serialize};

use crate::domain::playback::ControlId;
use crate::domain::TopicId;

/// 交互手势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationGesture {
    Tap,
    DoubleTap,
}

impl ActivationGesture {
    /// 对应的 DOM 事件名
    pub fn dom_event(self) -> &'static str {
        match self {
            ActivationGesture::Tap => "click",
            ActivationGesture::DoubleTap => "dblclick",
        }
    }
}

/// 可绑定交互的元素种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingTarget {
    /// 句子播放按钮
    PlayButton,
    /// 句子中的单词
    SentenceWord,
    /// 词汇卡片
    WordCard,
    /// 词汇卡片中的发音按钮
    WordPlayButton,
    /// 语法笔记标题
    GrammarTitle,
}

impl BindingTarget {
    pub const ALL: [BindingTarget; 5] = [
        BindingTarget::PlayButton,
        BindingTarget::SentenceWord,
        BindingTarget::WordCard,
        BindingTarget::WordPlayButton,
        BindingTarget::GrammarTitle,
    ];

    /// 句子列表内的 CSS 选择器（按文档顺序编号）
    pub fn selector(self) -> &'static str {
        match self {
            BindingTarget::PlayButton => ".play-btn",
            BindingTarget::SentenceWord => ".sentence-english .word",
            BindingTarget::WordCard => ".word-card",
            BindingTarget::WordPlayButton => ".word-play-btn",
            BindingTarget::GrammarTitle => ".grammar-title",
        }
    }

    /// 发音后的短暂视觉反馈样式
    pub fn flash_class(self) -> Option<&'static str> {
        match self {
            BindingTarget::SentenceWord => Some("tapped"),
            BindingTarget::WordCard => Some("highlight"),
            BindingTarget::WordPlayButton => Some("playing"),
            BindingTarget::PlayButton | BindingTarget::GrammarTitle => None,
        }
    }
}

/// 交给客户端的绑定描述（每种元素一条）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingDescriptor {
    pub target: BindingTarget,
    pub selector: &'static str,
    pub gesture: ActivationGesture,
    pub dom_event: &'static str,
}

/// 页面事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PageEvent {
    /// 操作提示（随设备模式）
    Subtitle { text: String },
    /// 导航中唯一激活的主题
    ActiveTopic { topic_id: TopicId },
    /// 标题与进度
    Heading { title: String, progress: String },
    /// 句子列表整体替换，附带本代次的绑定
    SentencesReplaced {
        generation: u64,
        html: String,
        bindings: Vec<BindingDescriptor>,
    },
    /// 播放按钮的 "playing" 标记
    PlayingMarker { control: ControlId, playing: bool },
    /// 短暂高亮
    Flash {
        generation: u64,
        target: BindingTarget,
        index: usize,
        class: &'static str,
        duration_ms: u64,
    },
    /// 语法笔记展开/收起
    GrammarToggled { generation: u64, index: usize },
}

/// Page Surface Port
pub trait PageSurfacePort: Send + Sync {
    fn apply(&self, event: PageEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_event_wire_format() {
        let event = PageEvent::PlayingMarker {
            control: ControlId::new(3, 1),
            playing: true,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "event": "playing_marker",
                "data": {"control": {"generation": 3, "slot": 1}, "playing": true}
            })
        );
    }

    #[test]
    fn test_descriptor_serializes_snake_case_target() {
        let descriptor = BindingDescriptor {
            target: BindingTarget::WordPlayButton,
            selector: BindingTarget::WordPlayButton.selector(),
            gesture: ActivationGesture::Tap,
            dom_event: ActivationGesture::Tap.dom_event(),
        };
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            serde_json::json!({
                "target": "word_play_button",
                "selector": ".word-play-btn",
                "gesture": "tap",
                "dom_event": "click"
            })
        );
    }
}
