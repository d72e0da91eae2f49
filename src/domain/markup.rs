//! 页面片段渲染
//!
//! 纯函数：主题导航、句子卡片、词汇卡片、语法笔记的 HTML 片段生成，
//! 以及 HTML 转义和英文句子的单词切分。缺失或为空的可选字段只会让对应区块消失，
//! 不会产生错误。

use super::content::{Sentence, Topic, TopicId, Word, WordKind};

const PLAY_ICON: &str = r#"<svg width="18" height="18" viewBox="0 0 24 24" fill="currentColor"><path d="M8 5v14l11-7z"/></svg>"#;
const SPEAKER_ICON: &str = r#"<svg width="14" height="14" viewBox="0 0 24 24" fill="currentColor"><path d="M3 9v6h4l5 5V4L7 9H3zm13.5 3c0-1.77-1.02-3.29-2.5-4.03v8.05c1.48-.73 2.5-2.25 2.5-4.02z"/></svg>"#;
const CORE_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="currentColor"><path d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm-2 15l-5-5 1.41-1.41L10 14.17l7.59-7.59L19 8l-9 9z"/></svg>"#;
const TOPIC_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="currentColor"><path d="M19 3H5c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h14c1.1 0 2-.9 2-2V5c0-1.1-.9-2-2-2zm-5 14H7v-2h7v2zm3-4H7v-2h10v2zm0-4H7V7h10v2z"/></svg>"#;
const GRAMMAR_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="currentColor"><path d="M9 21c0 .55.45 1 1 1h4c.55 0 1-.45 1-1v-1H9v1zm3-19C8.14 2 5 5.14 5 9c0 2.38 1.19 4.47 3 5.74V17c0 .55.45 1 1 1h6c.55 0 1-.45 1-1v-2.26c1.81-1.27 3-3.36 3-5.74 0-3.86-3.14-7-7-7z"/></svg>"#;
const TOGGLE_ICON: &str = r#"<svg class="toggle-icon" width="16" height="16" viewBox="0 0 24 24" fill="currentColor"><path d="M7.41 8.59L12 13.17l4.59-4.58L18 10l-6 6-6-6 1.41-1.41z"/></svg>"#;

/// 转义 HTML 特殊字符 `& < > " '`
///
/// 单次扫描，输入视为原始文本（不识别已有实体）
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 句子文本片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPiece<'a> {
    /// 单词：一个或多个 ASCII 字母，可带一次 `'` + 字母后缀（如 don't）
    Word(&'a str),
    /// 其他字符（空白、标点、非 ASCII 文本）
    Other(&'a str),
}

/// 句子切分迭代器
///
/// 只按 ASCII 字节判定边界，切片位置总在字符边界上
pub struct TextPieces<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextPieces<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

#[inline]
fn scan_letters(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    pos
}

impl<'a> Iterator for TextPieces<'a> {
    type Item = TextPiece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        if bytes[start].is_ascii_alphabetic() {
            let mut end = scan_letters(bytes, start);
            if end + 1 < bytes.len()
                && bytes[end] == b'\''
                && bytes[end + 1].is_ascii_alphabetic()
            {
                end = scan_letters(bytes, end + 1);
            }
            self.pos = end;
            Some(TextPiece::Word(&self.text[start..end]))
        } else {
            let mut end = start;
            while end < bytes.len() && !bytes[end].is_ascii_alphabetic() {
                end += 1;
            }
            self.pos = end;
            Some(TextPiece::Other(&self.text[start..end]))
        }
    }
}

/// 句子中所有可点击的单词（按出现顺序）
pub fn word_tokens(text: &str) -> impl Iterator<Item = &str> {
    TextPieces::new(text).filter_map(|piece| match piece {
        TextPiece::Word(word) => Some(word),
        TextPiece::Other(_) => None,
    })
}

/// 把句子中的每个单词包装成可点击的 span，其余字符原样输出
pub fn tokenize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for piece in TextPieces::new(text) {
        match piece {
            TextPiece::Word(word) => {
                out.push_str(r#"<span class="word">"#);
                out.push_str(word);
                out.push_str("</span>");
            }
            TextPiece::Other(other) => out.push_str(other),
        }
    }
    out
}

fn info_item(class: &str, label: &str, content: &str) -> String {
    format!(
        r#"<div class="word-info-item {class}"><span class="info-label">{label}</span><span class="info-content">{content}</span></div>"#
    )
}

fn push_optional_item(out: &mut String, class: &str, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push_str(&info_item(class, label, &escape_html(value)));
    }
}

/// 词汇卡片
///
/// 扩展信息固定顺序：搭配、记忆、用法、辨析，各自仅在有内容时出现
pub fn render_word_card(word: &Word, kind: WordKind) -> String {
    let mut extra = String::new();

    if !word.collocations.is_empty() {
        let joined = word
            .collocations
            .iter()
            .map(|c| escape_html(c))
            .collect::<Vec<_>>()
            .join(" | ");
        extra.push_str(&info_item("collocations", "搭配", &joined));
    }
    push_optional_item(&mut extra, "memory", "记忆", word.memory.as_deref());
    push_optional_item(&mut extra, "usage", "用法", word.usage.as_deref());
    push_optional_item(&mut extra, "comparison", "辨析", word.comparison.as_deref());

    let extra_html = if extra.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="word-extra">{extra}</div>"#)
    };

    let name = escape_html(&word.word);
    format!(
        r#"<div class="word-card {class}" data-word="{name}"><div class="word-card-header"><span class="word-name">{name}</span><span class="word-phonetic">/{phonetic}/</span><button class="word-play-btn" data-word="{name}" title="播放发音">{icon}</button></div><div class="word-definition">{definition}</div>{extra_html}</div>"#,
        class = kind.card_class(),
        phonetic = escape_html(&word.phonetic),
        icon = SPEAKER_ICON,
        definition = escape_html(&word.definition),
    )
}

fn render_words_section(words: &[Word], kind: WordKind) -> String {
    if words.is_empty() {
        return String::new();
    }
    let (section_class, icon, label) = match kind {
        WordKind::Core => ("words-section", CORE_ICON, "核心词汇"),
        WordKind::Topic => ("words-section topic-words-section", TOPIC_ICON, "主题词汇"),
    };
    let cards: String = words.iter().map(|w| render_word_card(w, kind)).collect();
    format!(
        r#"<div class="{section_class}"><div class="words-header">{icon}{label} ({count})</div><div class="words-grid">{cards}</div></div>"#,
        count = words.len(),
    )
}

/// 语法笔记（标题为空时返回空串）
pub fn render_grammar_block(sentence: &Sentence) -> String {
    let Some(title) = sentence.grammar_title() else {
        return String::new();
    };
    let notes: String = sentence
        .grammar_notes
        .iter()
        .map(|note| format!("<p>{}</p>", escape_html(note)))
        .collect();
    format!(
        r#"<div class="grammar-section"><div class="grammar-title" data-sentence-id="{id}">{GRAMMAR_ICON}语法笔记：{title}{TOGGLE_ICON}</div><div class="grammar-notes" id="grammar-{id}">{notes}</div></div>"#,
        id = sentence.id,
        title = escape_html(title),
    )
}

/// 句子卡片：头部（编号、可点击原句、播放按钮）+ 主体（翻译、语法、核心词汇、主题词汇）
pub fn render_sentence_card(sentence: &Sentence) -> String {
    format!(
        r#"<div class="sentence-card" data-sentence-id="{id}"><div class="sentence-header"><span class="sentence-number">{id}</span><div class="sentence-english">{english}</div><button class="play-btn" data-sentence-id="{id}" title="播放句子">{PLAY_ICON}</button></div><div class="sentence-body"><p class="sentence-chinese">{chinese}</p>{grammar}{core}{topic}</div></div>"#,
        id = sentence.id,
        english = tokenize_words(&sentence.source_text),
        chinese = escape_html(&sentence.translation),
        grammar = render_grammar_block(sentence),
        core = render_words_section(&sentence.core_words, WordKind::Core),
        topic = render_words_section(&sentence.topic_words, WordKind::Topic),
    )
}

/// 主题导航按钮
pub fn render_topics_nav(topics: &[Topic], active: Option<TopicId>) -> String {
    topics
        .iter()
        .map(|topic| {
            let class = if Some(topic.id) == active {
                "topic-btn active"
            } else {
                "topic-btn"
            };
            format!(
                r#"<button class="{class}" data-topic-id="{id}">{name}</button>"#,
                id = topic.id,
                name = escape_html(&topic.name),
            )
        })
        .collect()
}

/// 进度文字（按声明的句子数）
pub fn progress_label(topic: &Topic) -> String {
    format!("共 {} 个句子", topic.declared_len())
}

/// 用于去除 HTML 实体的辅助（仅测试用）
#[cfg(test)]
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
