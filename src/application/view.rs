//! View Controller - 主题切换与交互绑定
//!
//! 每次渲染都是「渲染 → 绑定」两步：先整体替换句子列表，再为新的代次
//! 从头构建绑定表。旧代次的绑定随旧标记一起失效，客户端带着过期代次
//! 发来的交互会被直接忽略。

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::{
    ActivationGesture, BindingDescriptor, BindingTarget, PageEvent, PageSurfacePort,
};
use crate::domain::markup::{progress_label, render_sentence_card, word_tokens};
use crate::domain::playback::ControlId;
use crate::domain::{Catalogue, Sentence, SentenceId, Topic, TopicId};

/// 设备输入模式（每个会话判定一次）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceMode {
    Touch,
    Pointer,
}

impl DeviceMode {
    pub fn detect(touch_capable: bool) -> Self {
        if touch_capable {
            DeviceMode::Touch
        } else {
            DeviceMode::Pointer
        }
    }

    /// 单词、词汇卡片发音所用的手势
    pub fn word_gesture(self) -> ActivationGesture {
        match self {
            DeviceMode::Touch => ActivationGesture::Tap,
            DeviceMode::Pointer => ActivationGesture::DoubleTap,
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            DeviceMode::Touch => "点击单词即可发音",
            DeviceMode::Pointer => "双击单词即可发音",
        }
    }
}

/// 单个可交互元素绑定的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    PlaySentence {
        sentence_id: SentenceId,
        control: ControlId,
    },
    PronounceWord {
        word: String,
    },
    ToggleGrammar {
        sentence_id: SentenceId,
    },
}

/// 一次渲染代次的全部绑定
///
/// 每类元素按文档顺序编号，与客户端 `querySelectorAll` 的下标一一对应
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    generation: u64,
    word_gesture: Option<ActivationGesture>,
    entries: HashMap<BindingTarget, Vec<Binding>>,
}

impl BindingTable {
    pub fn build<'a>(
        generation: u64,
        sentences: impl IntoIterator<Item = &'a Sentence>,
        word_gesture: ActivationGesture,
    ) -> Self {
        let mut entries: HashMap<BindingTarget, Vec<Binding>> = BindingTarget::ALL
            .iter()
            .map(|target| (*target, Vec::new()))
            .collect();

        let mut push = |target: BindingTarget, binding: Binding| {
            entries.entry(target).or_default().push(binding);
        };

        for (slot, sentence) in sentences.into_iter().enumerate() {
            push(
                BindingTarget::PlayButton,
                Binding::PlaySentence {
                    sentence_id: sentence.id,
                    control: ControlId::new(generation, slot),
                },
            );

            for token in word_tokens(&sentence.source_text) {
                push(
                    BindingTarget::SentenceWord,
                    Binding::PronounceWord {
                        word: token.to_string(),
                    },
                );
            }

            if sentence.has_grammar() {
                push(
                    BindingTarget::GrammarTitle,
                    Binding::ToggleGrammar {
                        sentence_id: sentence.id,
                    },
                );
            }

            for word in sentence.core_words.iter().chain(&sentence.topic_words) {
                let binding = Binding::PronounceWord {
                    word: word.word.clone(),
                };
                push(BindingTarget::WordCard, binding.clone());
                push(BindingTarget::WordPlayButton, binding);
            }
        }

        Self {
            generation,
            word_gesture: Some(word_gesture),
            entries,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self, target: BindingTarget) -> usize {
        self.entries.get(&target).map_or(0, Vec::len)
    }

    /// 元素所需的手势
    ///
    /// 只有句中单词和词汇卡片随设备模式变化，其余一律单击
    pub fn gesture_for(&self, target: BindingTarget) -> ActivationGesture {
        match target {
            BindingTarget::SentenceWord | BindingTarget::WordCard => {
                self.word_gesture.unwrap_or(ActivationGesture::Tap)
            }
            BindingTarget::PlayButton
            | BindingTarget::WordPlayButton
            | BindingTarget::GrammarTitle => ActivationGesture::Tap,
        }
    }

    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        BindingTarget::ALL
            .iter()
            .map(|target| {
                let gesture = self.gesture_for(*target);
                BindingDescriptor {
                    target: *target,
                    selector: target.selector(),
                    gesture,
                    dom_event: gesture.dom_event(),
                }
            })
            .collect()
    }

    /// 查找交互对应的绑定；代次、下标或手势不符时返回 None
    pub fn resolve(
        &self,
        generation: u64,
        target: BindingTarget,
        index: usize,
        gesture: ActivationGesture,
    ) -> Option<&Binding> {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Interaction from stale render ignored"
            );
            return None;
        }
        if gesture != self.gesture_for(target) {
            tracing::debug!(target = ?target, gesture = ?gesture, "Gesture not bound for target");
            return None;
        }
        self.entries.get(&target).and_then(|list| list.get(index))
    }
}

/// 按主题声明顺序渲染句子列表，跳过缺失的句子
pub fn render_sentence_list(catalogue: &Catalogue, topic: &Topic) -> String {
    catalogue
        .resolve_sentences(topic)
        .map(render_sentence_card)
        .collect()
}

/// View Controller
pub struct ViewController {
    catalogue: Arc<Catalogue>,
    surface: Arc<dyn PageSurfacePort>,
    mode: DeviceMode,
    current_topic: Option<TopicId>,
    bindings: BindingTable,
}

impl ViewController {
    pub fn new(
        catalogue: Arc<Catalogue>,
        surface: Arc<dyn PageSurfacePort>,
        mode: DeviceMode,
    ) -> Self {
        Self {
            catalogue,
            surface,
            mode,
            current_topic: None,
            bindings: BindingTable::default(),
        }
    }

    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    pub fn current_topic(&self) -> Option<TopicId> {
        self.current_topic
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// 发送随设备模式变化的操作提示
    pub fn announce(&self) {
        self.surface.apply(PageEvent::Subtitle {
            text: self.mode.subtitle().to_string(),
        });
    }

    /// 选择首个可用主题：优先客户端给出的主题，否则目录中第一个
    pub fn select_initial(&mut self, preferred: Option<TopicId>) -> bool {
        if let Some(id) = preferred {
            if self.select_topic(id) {
                return true;
            }
        }
        match self.catalogue.first_topic().map(|t| t.id) {
            Some(first) => self.select_topic(first),
            None => {
                tracing::warn!("Catalogue has no topics, nothing to display");
                false
            }
        }
    }

    /// 切换主题；未知主题不做任何改变
    pub fn select_topic(&mut self, topic_id: TopicId) -> bool {
        let catalogue = self.catalogue.clone();
        let Some(topic) = catalogue.topic(topic_id) else {
            tracing::debug!(topic_id, "Unknown topic selected, ignored");
            return false;
        };

        self.current_topic = Some(topic.id);
        self.surface.apply(PageEvent::ActiveTopic { topic_id: topic.id });
        self.surface.apply(PageEvent::Heading {
            title: topic.name.clone(),
            progress: progress_label(topic),
        });

        // 渲染
        let sentences: Vec<&Sentence> = catalogue.resolve_sentences(topic).collect();
        let html: String = sentences.iter().map(|s| render_sentence_card(s)).collect();

        // 绑定
        let generation = self.bindings.generation() + 1;
        self.bindings = BindingTable::build(generation, sentences, self.mode.word_gesture());

        tracing::debug!(
            topic_id,
            generation,
            declared = topic.declared_len(),
            rendered = self.bindings.len(BindingTarget::PlayButton),
            "Topic rendered"
        );

        self.surface.apply(PageEvent::SentencesReplaced {
            generation,
            html,
            bindings: self.bindings.descriptors(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingSurface;
    use crate::domain::Word;

    fn word(name: &str) -> Word {
        Word {
            word: name.to_string(),
            ..Default::default()
        }
    }

    fn catalogue() -> Arc<Catalogue> {
        let sentences = vec![
            Sentence {
                id: 1,
                source_text: "I don't know.".to_string(),
                core_words: vec![word("know")],
                topic_words: vec![word("idea")],
                grammar_title: Some("否定".to_string()),
                grammar_notes: vec!["do not 缩写".to_string()],
                ..Default::default()
            },
            Sentence {
                id: 2,
                source_text: "Good morning".to_string(),
                core_words: vec![word("morning")],
                ..Default::default()
            },
        ];
        let topics = vec![
            Topic {
                id: 10,
                name: "日常".to_string(),
                sentence_ids: vec![1, 99, 2],
            },
            Topic {
                id: 20,
                name: "问候".to_string(),
                sentence_ids: vec![2],
            },
        ];
        Arc::new(Catalogue::new(topics, sentences))
    }

    fn controller(mode: DeviceMode) -> (ViewController, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        (
            ViewController::new(catalogue(), surface.clone(), mode),
            surface,
        )
    }

    #[test]
    fn test_device_mode_resolution() {
        assert_eq!(DeviceMode::detect(true), DeviceMode::Touch);
        assert_eq!(DeviceMode::detect(false), DeviceMode::Pointer);
        assert_eq!(DeviceMode::Touch.word_gesture(), ActivationGesture::Tap);
        assert_eq!(DeviceMode::Pointer.word_gesture(), ActivationGesture::DoubleTap);
        assert_eq!(DeviceMode::Touch.subtitle(), "点击单词即可发音");
        assert_eq!(DeviceMode::Pointer.subtitle(), "双击单词即可发音");
    }

    #[test]
    fn test_select_topic_skips_missing_sentences() {
        let (mut view, surface) = controller(DeviceMode::Pointer);
        assert!(view.select_topic(10));

        let html = surface.last_html().unwrap();
        assert_eq!(html.matches(r#"<div class="sentence-card""#).count(), 2);
        assert_eq!(view.bindings().len(BindingTarget::PlayButton), 2);

        let events = surface.events();
        assert_eq!(events[0], PageEvent::ActiveTopic { topic_id: 10 });
        assert_eq!(
            events[1],
            PageEvent::Heading {
                title: "日常".to_string(),
                progress: "共 3 个句子".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_topic_changes_nothing() {
        let (mut view, surface) = controller(DeviceMode::Pointer);
        view.select_topic(20);
        let before = surface.events().len();
        let generation = view.bindings().generation();

        assert!(!view.select_topic(404));
        assert_eq!(surface.events().len(), before);
        assert_eq!(view.current_topic(), Some(20));
        assert_eq!(view.bindings().generation(), generation);
    }

    #[test]
    fn test_every_render_rebinds_with_new_generation() {
        let (mut view, surface) = controller(DeviceMode::Touch);
        view.select_topic(10);
        let first = view.bindings().generation();
        view.select_topic(10);
        let second = view.bindings().generation();

        assert_eq!(second, first + 1);
        assert_eq!(surface.last_generation(), Some(second));
        assert!(view
            .bindings()
            .resolve(first, BindingTarget::PlayButton, 0, ActivationGesture::Tap)
            .is_none());
        assert_eq!(
            view.bindings()
                .resolve(second, BindingTarget::PlayButton, 1, ActivationGesture::Tap),
            Some(&Binding::PlaySentence {
                sentence_id: 2,
                control: ControlId::new(second, 1),
            })
        );
    }

    #[test]
    fn test_binding_order_follows_document_order() {
        let catalogue = catalogue();
        let topic = catalogue.topic(10).unwrap();
        let sentences: Vec<&Sentence> = catalogue.resolve_sentences(topic).collect();
        let table = BindingTable::build(1, sentences, ActivationGesture::Tap);

        let words: Vec<_> = (0..table.len(BindingTarget::SentenceWord))
            .filter_map(|i| {
                table.resolve(1, BindingTarget::SentenceWord, i, ActivationGesture::Tap)
            })
            .collect();
        assert_eq!(
            words,
            vec![
                &Binding::PronounceWord { word: "I".into() },
                &Binding::PronounceWord { word: "don't".into() },
                &Binding::PronounceWord { word: "know".into() },
                &Binding::PronounceWord { word: "Good".into() },
                &Binding::PronounceWord { word: "morning".into() },
            ]
        );

        assert_eq!(table.len(BindingTarget::WordCard), 3);
        assert_eq!(table.len(BindingTarget::WordPlayButton), 3);
        assert_eq!(
            table.resolve(1, BindingTarget::WordCard, 1, ActivationGesture::Tap),
            Some(&Binding::PronounceWord { word: "idea".into() })
        );
        assert_eq!(table.len(BindingTarget::GrammarTitle), 1);
    }

    #[test]
    fn test_binding_counts_match_rendered_markup() {
        let catalogue = catalogue();
        let topic = catalogue.topic(10).unwrap();
        let html = render_sentence_list(&catalogue, topic);
        let sentences: Vec<&Sentence> = catalogue.resolve_sentences(topic).collect();
        let table = BindingTable::build(1, sentences, ActivationGesture::Tap);

        assert_eq!(
            html.matches(r#"<span class="word">"#).count(),
            table.len(BindingTarget::SentenceWord)
        );
        assert_eq!(
            html.matches(r#"class="word-play-btn""#).count(),
            table.len(BindingTarget::WordPlayButton)
        );
        assert_eq!(
            html.matches(r#"class="grammar-title""#).count(),
            table.len(BindingTarget::GrammarTitle)
        );
    }

    #[test]
    fn test_gesture_depends_on_device_mode_for_word_targets_only() {
        let (mut view, surface) = controller(DeviceMode::Pointer);
        view.select_topic(20);
        let generation = view.bindings().generation();
        let table = view.bindings();

        assert!(table
            .resolve(generation, BindingTarget::SentenceWord, 0, ActivationGesture::Tap)
            .is_none());
        assert!(table
            .resolve(generation, BindingTarget::SentenceWord, 0, ActivationGesture::DoubleTap)
            .is_some());
        assert!(table
            .resolve(generation, BindingTarget::WordPlayButton, 0, ActivationGesture::Tap)
            .is_some());
        assert!(table
            .resolve(generation, BindingTarget::PlayButton, 0, ActivationGesture::DoubleTap)
            .is_none());

        let descriptors = match surface.events().last() {
            Some(PageEvent::SentencesReplaced { bindings, .. }) => bindings.clone(),
            other => panic!("unexpected event: {other:?}"),
        };
        let word_card = descriptors
            .iter()
            .find(|d| d.target == BindingTarget::WordCard)
            .unwrap();
        assert_eq!(word_card.dom_event, "dblclick");
        assert_eq!(word_card.selector, ".word-card");
    }

    #[test]
    fn test_select_initial_prefers_known_topic() {
        let (mut view, _) = controller(DeviceMode::Touch);
        assert!(view.select_initial(Some(20)));
        assert_eq!(view.current_topic(), Some(20));

        let (mut view, _) = controller(DeviceMode::Touch);
        assert!(view.select_initial(Some(404)));
        assert_eq!(view.current_topic(), Some(10));
    }

    #[test]
    fn test_select_initial_on_empty_catalogue() {
        let surface = Arc::new(RecordingSurface::default());
        let mut view = ViewController::new(
            Arc::new(Catalogue::default()),
            surface.clone(),
            DeviceMode::Pointer,
        );
        assert!(!view.select_initial(None));
        assert!(surface.events().is_empty());
    }

    #[test]
    fn test_announce_sends_subtitle() {
        let (view, surface) = controller(DeviceMode::Touch);
        view.announce();
        assert_eq!(
            surface.events(),
            vec![PageEvent::Subtitle {
                text: "点击单词即可发音".to_string()
            }]
        );
    }
}
