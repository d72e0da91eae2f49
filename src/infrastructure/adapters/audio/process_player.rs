//! Process Audio Player - 通过外部播放器进程播放音频
//!
//! 进程自然退出 = 播放结束，非零退出 = 播放出错，结束进程 = 停止。
//! 播放器参数中的 `{file}` 会被替换为文件路径；没有占位符时路径追加在末尾。

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;

use tokio::process::{Child, Command};
use tokio::sync::oneshot;

use crate::application::ports::{
    PlaybackError, PlaybackEvent, PlaybackReporter, SentenceAudioPort,
};
use crate::domain::playback::{PlaybackTicket, SentenceAudio};

const FILE_PLACEHOLDER: &str = "{file}";

/// 播放器命令模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    program: String,
    args: Vec<String>,
}

impl PlayerCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// 代入文件路径后的参数列表
    pub fn args_for(&self, file: &Path) -> Vec<String> {
        let file = file.to_string_lossy();
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(FILE_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(FILE_PLACEHOLDER, &file)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(file.into_owned());
        }
        args
    }

    /// 启动播放进程（静默输出，句柄丢弃时结束进程）
    pub fn spawn(&self, file: &Path) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(self.args_for(file))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
    }
}

/// 退出状态转换为播放结果
pub(crate) fn exit_result(status: std::io::Result<ExitStatus>) -> Result<(), PlaybackError> {
    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(PlaybackError::Exited(status.to_string())),
        Err(e) => Err(PlaybackError::Backend(e.to_string())),
    }
}

struct ActivePlayback {
    ticket: PlaybackTicket,
    cancel: oneshot::Sender<()>,
}

/// 句子音频播放器
///
/// 同一时刻只有一个播放进程；新的 `start` 会先结束旧进程
pub struct ProcessAudioPlayer {
    root: PathBuf,
    command: PlayerCommand,
    active: Mutex<Option<ActivePlayback>>,
}

impl ProcessAudioPlayer {
    pub fn new(root: impl Into<PathBuf>, command: PlayerCommand) -> Self {
        Self {
            root: root.into(),
            command,
            active: Mutex::new(None),
        }
    }

    /// 音频文件的绝对位置
    pub fn resolve(&self, audio: &SentenceAudio) -> PathBuf {
        self.root.join(audio.relative_path())
    }

    fn take_active(&self) -> Option<ActivePlayback> {
        match self.active.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    fn set_active(&self, playback: ActivePlayback) {
        match self.active.lock() {
            Ok(mut guard) => *guard = Some(playback),
            Err(poisoned) => *poisoned.into_inner() = Some(playback),
        }
    }
}

impl SentenceAudioPort for ProcessAudioPlayer {
    fn start(&self, ticket: PlaybackTicket, audio: &SentenceAudio, reporter: PlaybackReporter) {
        self.stop();

        let path = self.resolve(audio);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.set_active(ActivePlayback {
            ticket,
            cancel: cancel_tx,
        });

        let command = self.command.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_rx => {
                    tracing::debug!(ticket = %ticket, "Player process stopped");
                }
                _ = play_file(&command, &path, ticket, &reporter) => {}
            }
        });
    }

    fn stop(&self) {
        if let Some(active) = self.take_active() {
            tracing::debug!(ticket = %active.ticket, "Stopping player process");
            let _ = active.cancel.send(());
        }
    }
}

/// 播放单个文件直到进程退出；future 被丢弃时进程随之结束
async fn play_file(
    command: &PlayerCommand,
    path: &Path,
    ticket: PlaybackTicket,
    reporter: &PlaybackReporter,
) {
    if tokio::fs::metadata(path).await.is_err() {
        reporter.report(PlaybackEvent::StartFailed {
            ticket,
            error: PlaybackError::NotFound(path.display().to_string()),
        });
        return;
    }

    let mut child = match command.spawn(path) {
        Ok(child) => child,
        Err(e) => {
            reporter.report(PlaybackEvent::StartFailed {
                ticket,
                error: PlaybackError::SpawnFailed(format!("{}: {}", command.program(), e)),
            });
            return;
        }
    };

    reporter.report(PlaybackEvent::Started(ticket));

    match exit_result(child.wait().await) {
        Ok(()) => reporter.report(PlaybackEvent::Ended(ticket)),
        Err(error) => reporter.report(PlaybackEvent::Failed { ticket, error }),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn sentence_dir() -> (tempfile::TempDir, SentenceAudio) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/007.mp3"), b"ID3").unwrap();
        (dir, SentenceAudio::for_sentence(7))
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<PlaybackEvent>) -> PlaybackEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("playback event in time")
            .expect("channel open")
    }

    #[test]
    fn test_placeholder_substitution() {
        let command = PlayerCommand::new("ffplay", vec!["-autoexit".into(), "{file}".into()]);
        assert_eq!(
            command.args_for(Path::new("/tmp/a.mp3")),
            vec!["-autoexit", "/tmp/a.mp3"]
        );

        let command = PlayerCommand::new("afplay", vec![]);
        assert_eq!(command.args_for(Path::new("x.mp3")), vec!["x.mp3"]);
    }

    #[test]
    fn test_resolve_under_audio_dir() {
        let player = ProcessAudioPlayer::new("/srv/page", PlayerCommand::new("true", vec![]));
        assert_eq!(
            player.resolve(&SentenceAudio::for_sentence(42)),
            PathBuf::from("/srv/page/audio/042.mp3")
        );
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let player = ProcessAudioPlayer::new(dir.path(), PlayerCommand::new("true", vec![]));
        let (reporter, mut rx) = PlaybackReporter::channel();
        let ticket = PlaybackTicket::new(1);

        player.start(ticket, &SentenceAudio::for_sentence(3), reporter);
        assert!(matches!(
            next_event(&mut rx).await,
            PlaybackEvent::StartFailed { error: PlaybackError::NotFound(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_natural_exit_reports_end() {
        let (dir, audio) = sentence_dir();
        let player = ProcessAudioPlayer::new(dir.path(), PlayerCommand::new("true", vec![]));
        let (reporter, mut rx) = PlaybackReporter::channel();
        let ticket = PlaybackTicket::new(1);

        player.start(ticket, &audio, reporter);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started(ticket));
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Ended(ticket));
    }

    #[tokio::test]
    async fn test_non_zero_exit_reports_failure() {
        let (dir, audio) = sentence_dir();
        let player = ProcessAudioPlayer::new(dir.path(), PlayerCommand::new("false", vec![]));
        let (reporter, mut rx) = PlaybackReporter::channel();
        let ticket = PlaybackTicket::new(2);

        player.start(ticket, &audio, reporter);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started(ticket));
        assert!(matches!(
            next_event(&mut rx).await,
            PlaybackEvent::Failed { error: PlaybackError::Exited(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_start() {
        let (dir, audio) = sentence_dir();
        let player = ProcessAudioPlayer::new(
            dir.path(),
            PlayerCommand::new("vocaboard-no-such-player", vec![]),
        );
        let (reporter, mut rx) = PlaybackReporter::channel();

        player.start(PlaybackTicket::new(1), &audio, reporter);
        assert!(matches!(
            next_event(&mut rx).await,
            PlaybackEvent::StartFailed { error: PlaybackError::SpawnFailed(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_stop_silences_playback() {
        let (dir, audio) = sentence_dir();
        let player = ProcessAudioPlayer::new(
            dir.path(),
            PlayerCommand::new("sh", vec!["-c".into(), "sleep 5".into(), "{file}".into()]),
        );
        let (reporter, mut rx) = PlaybackReporter::channel();
        let ticket = PlaybackTicket::new(1);

        player.start(ticket, &audio, reporter);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started(ticket));

        player.stop();
        let after = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(matches!(after, Err(_) | Ok(None)));
    }
}
