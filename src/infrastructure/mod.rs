//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod catalogue;
pub mod http;

pub use adapters::{ProcessAudioPlayer, RemoteDictionaryPronouncer, SpeechSynthesizer};
pub use catalogue::load_catalogue;
pub use http::{AppState, HttpServer};
