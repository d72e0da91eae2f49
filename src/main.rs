//! Vocaboard - 英语词汇学习页面
//!
//! 分层架构:
//! - Domain: content/, markup, playback/
//! - Application: view, playback, session, queries, ports
//! - Infrastructure: http, adapters, catalogue

use std::sync::Arc;
use std::time::Duration;

use vocaboard::application::{PronunciationChain, PronunciationStrategy, SentenceAudioPort};
use vocaboard::config::{load_config, print_config, AppConfig};
use vocaboard::infrastructure::adapters::{
    PlayerCommand, ProcessAudioPlayer, RemoteDictionaryConfig, RemoteDictionaryPronouncer,
    SpeechSynthesizer, SpeechSynthesizerConfig,
};
use vocaboard::infrastructure::catalogue::load_catalogue;
use vocaboard::infrastructure::http::{AppState, HttpServer, SentenceAudioFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},vocaboard={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Vocaboard - 英语词汇学习");
    print_config(&config);

    // 加载内容目录（只读，所有会话共享）
    let catalogue = Arc::new(load_catalogue(&config.catalogue.path).await?);

    // 句子音频：每个会话独占一个播放器
    let player = PlayerCommand::new(&config.audio.player, config.audio.player_args.clone());
    let audio_root = config.audio.root.clone();
    let sentence_player = player.clone();
    let sentence_audio: SentenceAudioFactory = Arc::new(move || {
        Box::new(ProcessAudioPlayer::new(audio_root.clone(), sentence_player.clone()))
            as Box<dyn SentenceAudioPort>
    });

    // 单词发音策略链：在线词典 → 本机语音合成
    let pronunciation = Arc::new(build_pronunciation_chain(&config, player)?);
    tracing::info!(strategies = ?pronunciation.strategy_names(), "Pronunciation chain ready");

    let state = AppState::new(
        catalogue,
        pronunciation,
        sentence_audio,
        Duration::from_millis(config.ui.flash_ms),
    );
    let server = HttpServer::new(config.server.clone(), state);

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn build_pronunciation_chain(
    config: &AppConfig,
    clip_player: PlayerCommand,
) -> anyhow::Result<PronunciationChain> {
    let mut strategies: Vec<Arc<dyn PronunciationStrategy>> = Vec::new();

    if config.pronunciation.enabled {
        let dictionary = RemoteDictionaryPronouncer::new(
            RemoteDictionaryConfig {
                url: config.pronunciation.url.clone(),
                accent: config.pronunciation.accent,
                timeout_secs: config.pronunciation.timeout_secs,
            },
            clip_player,
        )?;
        strategies.push(Arc::new(dictionary));
    }

    if config.speech.enabled {
        strategies.push(Arc::new(SpeechSynthesizer::new(SpeechSynthesizerConfig {
            program: config.speech.program.clone(),
            words_per_minute: config.speech.words_per_minute,
        })));
    }

    if strategies.is_empty() {
        tracing::warn!("All pronunciation strategies disabled, words will be silent");
    }

    Ok(PronunciationChain::new(strategies))
}
