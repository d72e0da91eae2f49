//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod page_surface;
mod pronunciation;
mod sentence_audio;

pub use page_surface::{
    ActivationGesture, BindingDescriptor, BindingTarget, PageEvent, PageSurfacePort,
};
pub use pronunciation::{PronunciationError, PronunciationStrategy};
pub use sentence_audio::{
    PlaybackError, PlaybackEvent, PlaybackReporter, SentenceAudioPort,
};
