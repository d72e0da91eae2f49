//! Remote Dictionary Pronouncer - 在线词典发音
//!
//! GET {url}?audio=<单词>&type=<口音>
//! 返回 mp3 音频，写入临时文件后交给播放器进程播放，播放结束后删除。
//! 非音频响应、或播放器在启动窗口内出错退出，都算作本策略失败，交给下一个策略。

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header::CONTENT_TYPE, Client};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

use crate::application::ports::{PronunciationError, PronunciationStrategy};
use crate::domain::playback::NormalizedWord;
use crate::infrastructure::adapters::audio::{exit_result, PlayerCommand};

/// 查询参数编码：除字母数字和 `-_.!~*'()` 外全部编码
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 播放器在此窗口内退出时按退出码判定成败，超过窗口视为已开始播放
const EARLY_EXIT_WINDOW: Duration = Duration::from_millis(300);

/// 在线词典配置
#[derive(Debug, Clone)]
pub struct RemoteDictionaryConfig {
    /// 发音接口地址
    pub url: String,
    /// 口音类型
    pub accent: u8,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for RemoteDictionaryConfig {
    fn default() -> Self {
        Self {
            url: "https://dict.youdao.com/dictvoice".to_string(),
            accent: 2,
            timeout_secs: 5,
        }
    }
}

/// 在线词典发音策略
pub struct RemoteDictionaryPronouncer {
    client: Client,
    config: RemoteDictionaryConfig,
    player: PlayerCommand,
    clip_dir: PathBuf,
}

impl RemoteDictionaryPronouncer {
    pub fn new(
        config: RemoteDictionaryConfig,
        player: PlayerCommand,
    ) -> Result<Self, PronunciationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PronunciationError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            player,
            clip_dir: std::env::temp_dir(),
        })
    }

    /// 单词发音地址
    pub fn pronunciation_url(&self, word: &NormalizedWord) -> String {
        format!(
            "{}?audio={}&type={}",
            self.config.url,
            utf8_percent_encode(word.as_str(), QUERY_COMPONENT),
            self.config.accent
        )
    }

    async fn fetch(&self, word: &NormalizedWord) -> Result<Vec<u8>, PronunciationError> {
        let url = self.pronunciation_url(word);
        tracing::debug!(url = %url, "Fetching dictionary pronunciation");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                PronunciationError::Timeout
            } else if e.is_connect() {
                PronunciationError::NetworkError(format!("Cannot connect to dictionary: {}", e))
            } else {
                PronunciationError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PronunciationError::ServiceError(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("audio/") {
            return Err(PronunciationError::ServiceError(format!(
                "Unexpected content type: {:?}",
                content_type
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| PronunciationError::NetworkError(format!("Failed to read audio: {}", e)))?;

        if audio.is_empty() {
            return Err(PronunciationError::ServiceError("Empty audio body".to_string()));
        }
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl PronunciationStrategy for RemoteDictionaryPronouncer {
    fn name(&self) -> &'static str {
        "remote_dictionary"
    }

    async fn pronounce(&self, word: &NormalizedWord) -> Result<(), PronunciationError> {
        let audio = self.fetch(word).await?;

        let clip = self
            .clip_dir
            .join(format!("vocaboard-{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&clip, &audio).await.map_err(|e| {
            PronunciationError::PlaybackError(format!("Failed to write clip: {}", e))
        })?;

        let mut child = match self.player.spawn(&clip) {
            Ok(child) => child,
            Err(e) => {
                let _ = tokio::fs::remove_file(&clip).await;
                return Err(PronunciationError::PlaybackError(format!(
                    "{}: {}",
                    self.player.program(),
                    e
                )));
            }
        };

        match timeout(EARLY_EXIT_WINDOW, child.wait()).await {
            Ok(status) => {
                let _ = tokio::fs::remove_file(&clip).await;
                exit_result(status).map_err(|e| {
                    PronunciationError::PlaybackError(format!("Dictionary clip: {}", e))
                })?;
                tracing::info!(
                    word = %word,
                    bytes = audio.len(),
                    "Dictionary pronunciation played"
                );
            }
            Err(_) => {
                tracing::info!(
                    word = %word,
                    bytes = audio.len(),
                    "Dictionary pronunciation playing"
                );
                tokio::spawn(async move {
                    if let Err(e) = exit_result(child.wait().await) {
                        tracing::warn!(error = %e, "Dictionary clip playback failed");
                    }
                    if let Err(e) = tokio::fs::remove_file(&clip).await {
                        tracing::debug!(
                            clip = %clip.display(),
                            error = %e,
                            "Failed to remove clip"
                        );
                    }
                });
            }
        }

        Ok(())
    }
}
