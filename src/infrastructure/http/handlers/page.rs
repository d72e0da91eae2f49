//! Page Handler - 页面外壳
//!
//! 服务端直接渲染导航与第一个主题，无脚本也能阅读；脚本连上
//! `/ws/page` 后由页面会话接管之后的所有渲染与交互。

use askama::Template;
use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::application::render_sentence_list;
use crate::domain::markup::{progress_label, render_topics_nav};
use crate::domain::Catalogue;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 页面外壳模板，`nav` 与 `sentences` 是已转义的片段
#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>英语词汇学习</title>
<style>
body { margin: 0; font-family: -apple-system, "PingFang SC", "Microsoft YaHei", sans-serif; background: #f5f7fa; color: #2c3e50; }
header { padding: 24px 16px 8px; text-align: center; }
header h1 { margin: 0; font-size: 24px; }
#subtitle { color: #7f8c8d; font-size: 14px; }
#topicsNav { display: flex; flex-wrap: wrap; gap: 8px; justify-content: center; padding: 8px 16px; }
.topic-btn { border: 1px solid #d0d7de; background: #fff; border-radius: 16px; padding: 6px 14px; cursor: pointer; }
.topic-btn.active { background: #3b82f6; border-color: #3b82f6; color: #fff; }
main { max-width: 860px; margin: 0 auto; padding: 8px 16px 48px; }
.topic-heading { display: flex; justify-content: space-between; align-items: baseline; }
#topicProgress { color: #7f8c8d; font-size: 14px; }
.sentence-card { background: #fff; border-radius: 12px; box-shadow: 0 1px 4px rgba(0,0,0,.08); margin: 16px 0; padding: 16px; }
.sentence-header { display: flex; gap: 12px; align-items: flex-start; }
.sentence-number { background: #eef2ff; color: #3b82f6; border-radius: 50%; min-width: 28px; height: 28px; display: flex; align-items: center; justify-content: center; font-size: 13px; }
.sentence-english { flex: 1; font-size: 18px; line-height: 1.6; }
.word { cursor: pointer; border-radius: 3px; }
.word:hover, .word.tapped { background: #fde68a; }
.play-btn, .word-play-btn { border: none; background: none; cursor: pointer; color: #3b82f6; }
.play-btn svg, .word-play-btn svg, .grammar-title svg, .words-header svg { width: 18px; height: 18px; vertical-align: middle; }
.play-btn.playing, .word-play-btn.playing { color: #ef4444; }
.sentence-chinese { color: #555; }
.grammar-title { cursor: pointer; color: #7c3aed; font-weight: 600; }
.grammar-notes { display: none; padding-left: 8px; border-left: 3px solid #ddd6fe; }
.grammar-notes.show { display: block; }
.words-header { font-weight: 600; margin: 12px 0 8px; }
.words-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 10px; }
.word-card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 10px; transition: background .2s; }
.topic-word-card { border-color: #bbf7d0; }
.word-card.highlight { background: #eff6ff; }
.word-card-header { display: flex; gap: 8px; align-items: center; }
.word-name { font-weight: 700; }
.word-phonetic { color: #6b7280; font-size: 13px; }
.word-extra { margin-top: 6px; font-size: 13px; }
.info-label { color: #6b7280; margin-right: 6px; }
</style>
</head>
<body>
<header>
<h1>英语词汇学习</h1>
<div id="subtitle"></div>
</header>
<nav id="topicsNav">{{ nav|safe }}</nav>
<main>
<div class="topic-heading"><h2 id="topicTitle">{{ title }}</h2><span id="topicProgress">{{ progress }}</span></div>
<div id="sentencesList">{{ sentences|safe }}</div>
</main>
<script>
(() => {
  const list = document.getElementById('sentencesList');
  const nav = document.getElementById('topicsNav');
  const state = { generation: 0, selectors: {} };
  const touch = ('ontouchstart' in window) || navigator.maxTouchPoints > 0;
  const scheme = location.protocol === 'https:' ? 'wss' : 'ws';
  const ws = new WebSocket(`${scheme}://${location.host}/ws/page`);
  const send = (msg) => { if (ws.readyState === WebSocket.OPEN) ws.send(JSON.stringify(msg)); };
  const activeTopic = () => {
    const btn = nav.querySelector('.topic-btn.active');
    return btn ? Number(btn.dataset.topicId) : null;
  };
  const element = (target, index) => {
    const selector = state.selectors[target];
    return selector ? list.querySelectorAll(selector)[index] : undefined;
  };

  ws.addEventListener('open', () => send({ type: 'hello', touch, topic_id: activeTopic() }));

  nav.addEventListener('click', (e) => {
    const btn = e.target.closest('.topic-btn');
    if (btn) send({ type: 'select_topic', topic_id: Number(btn.dataset.topicId) });
  });

  const bind = (bindings) => {
    state.selectors = {};
    for (const b of bindings) {
      state.selectors[b.target] = b.selector;
      list.querySelectorAll(b.selector).forEach((el, index) => {
        el.addEventListener(b.dom_event, (e) => {
          if (b.target === 'word_card' && e.target.closest('.word-play-btn')) return;
          e.preventDefault();
          e.stopPropagation();
          send({ type: 'activate', generation: state.generation, target: b.target, index, gesture: b.gesture });
        });
      });
    }
  };

  const handlers = {
    subtitle: (d) => { document.getElementById('subtitle').textContent = d.text; },
    active_topic: (d) => {
      nav.querySelectorAll('.topic-btn').forEach((btn) => {
        btn.classList.toggle('active', Number(btn.dataset.topicId) === d.topic_id);
      });
    },
    heading: (d) => {
      document.getElementById('topicTitle').textContent = d.title;
      document.getElementById('topicProgress').textContent = d.progress;
    },
    sentences_replaced: (d) => {
      list.innerHTML = d.html;
      state.generation = d.generation;
      bind(d.bindings);
    },
    playing_marker: (d) => {
      if (d.control.generation !== state.generation) return;
      const btn = element('play_button', d.control.slot);
      if (btn) btn.classList.toggle('playing', d.playing);
    },
    flash: (d) => {
      if (d.generation !== state.generation) return;
      const el = element(d.target, d.index);
      if (!el) return;
      el.classList.add(d.class);
      setTimeout(() => el.classList.remove(d.class), d.duration_ms);
    },
    grammar_toggled: (d) => {
      if (d.generation !== state.generation) return;
      const title = element('grammar_title', d.index);
      if (!title) return;
      title.classList.toggle('expanded');
      const notes = document.getElementById(`grammar-${title.dataset.sentenceId}`);
      if (notes) notes.classList.toggle('show');
    },
  };

  ws.addEventListener('message', (msg) => {
    const { event, data } = JSON.parse(msg.data);
    const handler = handlers[event];
    if (handler) handler(data);
  });
})();
</script>
</body>
</html>
"#,
    ext = "html"
)]
struct PageTemplate<'a> {
    nav: String,
    title: &'a str,
    progress: String,
    sentences: String,
}

/// 渲染完整页面，默认展示第一个主题
pub fn render_page(catalogue: &Catalogue) -> Result<String, askama::Error> {
    let first = catalogue.first_topic();
    let template = PageTemplate {
        nav: render_topics_nav(catalogue.topics(), first.map(|t| t.id)),
        title: first.map(|t| t.name.as_str()).unwrap_or_default(),
        progress: first.map(progress_label).unwrap_or_default(),
        sentences: first
            .map(|topic| render_sentence_list(catalogue, topic))
            .unwrap_or_default(),
    };
    template.render()
}

/// 页面入口
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_page(&state.catalogue)
        .map(Html)
        .map_err(|e| ApiError::Internal(format!("Failed to render page: {}", e)))
}
