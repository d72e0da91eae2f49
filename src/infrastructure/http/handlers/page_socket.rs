//! Page Session WebSocket
//!
//! 每个连接一个页面会话：
//! - 客户端文本消息解析为 `Interaction` 交给会话任务
//! - 会话产生的 `PageEvent` 序列化为 JSON 推送给客户端
//! - 任一方向结束即关闭会话（会话结束时停止句子播放）

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::{Interaction, PageSession};
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::surface::ChannelSurface;

/// 交互队列容量
const INTERACTION_BUFFER: usize = 64;

/// 页面会话 WebSocket 连接处理
pub async fn page_socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_page_socket(socket, state))
}

async fn handle_page_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (surface, mut page_rx) = ChannelSurface::channel();
    let (session, playback_rx) = PageSession::new(
        state.catalogue.clone(),
        Arc::new(surface),
        (state.sentence_audio)(),
        state.pronunciation.clone(),
        state.flash,
    );
    let session_id = session.id();
    let (interaction_tx, interaction_rx) = mpsc::channel::<Interaction>(INTERACTION_BUFFER);

    tracing::info!(session_id = %session_id, "Page socket connected");

    let session_task = tokio::spawn(session.run(interaction_rx, playback_rx));

    // 页面事件转发任务
    let mut forward_task = tokio::spawn(async move {
        while let Some(event) = page_rx.recv().await {
            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize page event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(session_id = %session_id, error = %e, "Failed to send page event");
                break;
            }
        }
    });

    // 客户端交互接收任务
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<Interaction>(&text) {
                    Ok(interaction) => {
                        if interaction_tx.send(interaction).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            session_id = %session_id,
                            error = %e,
                            "Malformed interaction ignored"
                        );
                    }
                },
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id, "Page socket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(session_id = %session_id, error = %e, "Page socket error");
                    break;
                }
                _ => {}
            }
        }
    });

    // 等待任一方向结束，另一方向随之中止
    tokio::select! {
        _ = &mut forward_task => receive_task.abort(),
        _ = &mut receive_task => forward_task.abort(),
    }

    if let Err(e) = session_task.await {
        tracing::error!(session_id = %session_id, error = %e, "Page session task failed");
    }
    tracing::info!(session_id = %session_id, "Page socket disconnected");
}
