//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "VOCABOARD";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOCABOARD_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOCABOARD_SERVER__PORT=8080`
/// - `VOCABOARD_CATALOGUE__PATH=/srv/words/catalogue.json`
/// - `VOCABOARD_AUDIO__PLAYER=ffplay`
/// - `VOCABOARD_PRONUNCIATION__ENABLED=false`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值
    builder = builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5070)?
        .set_default("catalogue.path", "data/catalogue.json")?
        .set_default("audio.root", "data")?
        .set_default("audio.player", "mpg123")?
        .set_default("pronunciation.enabled", true)?
        .set_default("pronunciation.url", "https://dict.youdao.com/dictvoice")?
        .set_default("pronunciation.accent", 2)?
        .set_default("pronunciation.timeout_secs", 5)?
        .set_default("speech.enabled", true)?
        .set_default("speech.program", "espeak-ng")?
        .set_default("speech.words_per_minute", 175)?
        .set_default("ui.flash_ms", 500)?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，例如 VOCABOARD_SERVER__PORT=8080
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.catalogue.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Catalogue path cannot be empty".to_string(),
        ));
    }

    if config.audio.player.is_empty() {
        return Err(ConfigError::ValidationError(
            "Audio player cannot be empty".to_string(),
        ));
    }

    if config.pronunciation.enabled {
        if config.pronunciation.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "Pronunciation URL cannot be empty when enabled".to_string(),
            ));
        }
        if config.pronunciation.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Pronunciation timeout cannot be 0".to_string(),
            ));
        }
    }

    if config.speech.enabled && config.speech.words_per_minute == 0 {
        return Err(ConfigError::ValidationError(
            "Speech rate cannot be 0 when speech fallback is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Page URL: {}", config.server.page_url());
    tracing::info!("Catalogue: {:?}", config.catalogue.path);
    tracing::info!("Audio Root: {:?}", config.audio.root);
    tracing::info!("Audio Player: {} {:?}", config.audio.player, config.audio.player_args);
    tracing::info!("Dictionary Enabled: {}", config.pronunciation.enabled);
    if config.pronunciation.enabled {
        tracing::info!("Dictionary URL: {}", config.pronunciation.url);
        tracing::info!("Dictionary Accent: {}", config.pronunciation.accent);
    }
    tracing::info!("Speech Fallback Enabled: {}", config.speech.enabled);
    if config.speech.enabled {
        tracing::info!("Speech Program: {}", config.speech.program);
    }
    tracing::info!("Flash Duration: {}ms", config.ui.flash_ms);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_player() {
        let mut config = AppConfig::default();
        config.audio.player = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_disabled_dictionary_skips_url_check() {
        let mut config = AppConfig::default();
        config.pronunciation.url = String::new();
        assert!(validate_config(&config).is_err());

        config.pronunciation.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_speech_rate() {
        let mut config = AppConfig::default();
        config.speech.words_per_minute = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[audio]\nplayer = \"ffplay\"\nplayer_args = [\"-nodisp\", \"-autoexit\", \"{{file}}\"]\n\n[ui]\nflash_ms = 800"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.audio.player, "ffplay");
        assert_eq!(config.audio.player_args, vec!["-nodisp", "-autoexit", "{file}"]);
        assert_eq!(config.ui.flash_ms, 800);
        assert_eq!(config.speech.program, "espeak-ng");
    }

    #[test]
    fn test_invalid_file_value_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 0").unwrap();
        assert!(matches!(
            load_config_from_path(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
