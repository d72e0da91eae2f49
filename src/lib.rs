//! Vocaboard - 英语词汇学习页面
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Content Context: 主题、句子、词汇与句子索引
//! - Playback Context: 音频资源命名、单词规范化、控件标识
//! - Markup: 页面片段渲染（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SentenceAudio, PronunciationStrategy, PageSurface）
//! - View / Playback: 视图控制器与播放控制器
//! - Session: 页面会话事件循环
//! - Queries: 只读查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 页面、只读 API、页面会话 WebSocket
//! - Adapters: 播放器进程、在线词典、语音合成
//! - Catalogue: JSON 内容目录加载

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
