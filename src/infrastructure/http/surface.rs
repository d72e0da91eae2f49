//! Channel Page Surface - 把页面事件交给 WebSocket 发送任务

use tokio::sync::mpsc;

use crate::application::{PageEvent, PageSurfacePort};

/// 页面事件通道
pub struct ChannelSurface {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl ChannelSurface {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PageSurfacePort for ChannelSurface {
    fn apply(&self, event: PageEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Page event dropped, socket already closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_forwarded_in_order() {
        let (surface, mut rx) = ChannelSurface::channel();
        surface.apply(PageEvent::ActiveTopic { topic_id: 1 });
        surface.apply(PageEvent::ActiveTopic { topic_id: 2 });
        assert_eq!(rx.recv().await, Some(PageEvent::ActiveTopic { topic_id: 1 }));
        assert_eq!(rx.recv().await, Some(PageEvent::ActiveTopic { topic_id: 2 }));

        drop(rx);
        surface.apply(PageEvent::ActiveTopic { topic_id: 3 });
    }
}
