//! Audio Adapter - 本机音频播放

mod process_player;

pub(crate) use process_player::exit_result;
pub use process_player::{PlayerCommand, ProcessAudioPlayer};
