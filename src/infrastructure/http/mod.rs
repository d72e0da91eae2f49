//! HTTP Layer - 页面、只读 API 与页面会话 WebSocket

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod surface;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::HttpServer;
pub use state::{AppState, SentenceAudioFactory};
pub use surface::ChannelSurface;
