//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 内容目录配置
    #[serde(default)]
    pub catalogue: CatalogueConfig,

    /// 句子音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 远程词典发音配置
    #[serde(default)]
    pub pronunciation: PronunciationConfig,

    /// 本机语音合成配置
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 页面交互配置
    #[serde(default)]
    pub ui: UiConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址（默认只监听本机，音频在本机播放）
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 浏览器访问地址
    pub fn page_url(&self) -> String {
        let host = if self.host == "0.0.0.0" {
            "localhost"
        } else {
            &self.host
        };
        format!("http://{}:{}/", host, self.port)
    }
}

/// 内容目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueConfig {
    /// 目录 JSON 文件路径
    #[serde(default = "default_catalogue_path")]
    pub path: PathBuf,
}

fn default_catalogue_path() -> PathBuf {
    PathBuf::from("data/catalogue.json")
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            path: default_catalogue_path(),
        }
    }
}

/// 句子音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 页面根目录，句子音频位于 `<root>/audio/NNN.mp3`
    #[serde(default = "default_audio_root")]
    pub root: PathBuf,

    /// 播放器程序
    #[serde(default = "default_player")]
    pub player: String,

    /// 播放器参数，`{file}` 会被替换为音频文件路径
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,
}

fn default_audio_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_player() -> String {
    "mpg123".to_string()
}

fn default_player_args() -> Vec<String> {
    vec!["-q".to_string(), "{file}".to_string()]
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            root: default_audio_root(),
            player: default_player(),
            player_args: default_player_args(),
        }
    }
}

/// 远程词典发音配置
#[derive(Debug, Clone, Deserialize)]
pub struct PronunciationConfig {
    /// 是否启用远程词典
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 发音接口地址
    #[serde(default = "default_dictionary_url")]
    pub url: String,

    /// 口音类型（1 = 英音，2 = 美音）
    #[serde(default = "default_accent")]
    pub accent: u8,

    /// 请求超时时间（秒）
    #[serde(default = "default_pronunciation_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_dictionary_url() -> String {
    "https://dict.youdao.com/dictvoice".to_string()
}

fn default_accent() -> u8 {
    2
}

fn default_pronunciation_timeout() -> u64 {
    5
}

impl Default for PronunciationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_dictionary_url(),
            accent: default_accent(),
            timeout_secs: default_pronunciation_timeout(),
        }
    }
}

/// 本机语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// 是否启用语音合成回退
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 合成器程序（espeak-ng 兼容参数）
    #[serde(default = "default_synthesizer")]
    pub program: String,

    /// 正常语速（每分钟词数）
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

fn default_synthesizer() -> String {
    "espeak-ng".to_string()
}

fn default_words_per_minute() -> u32 {
    175
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: default_synthesizer(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

/// 页面交互配置
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// 发音后高亮持续时间（毫秒）
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
}

fn default_flash_ms() -> u64 {
    500
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            flash_ms: default_flash_ms(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.pronunciation.url, "https://dict.youdao.com/dictvoice");
        assert_eq!(config.pronunciation.accent, 2);
        assert_eq!(config.speech.words_per_minute, 175);
        assert_eq!(config.ui.flash_ms, 500);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:5070");
        assert_eq!(config.page_url(), "http://127.0.0.1:5070/");
    }

    #[test]
    fn test_page_url_for_wildcard_host() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.page_url(), "http://localhost:8080/");
    }
}
