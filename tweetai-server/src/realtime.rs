use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::state::AppState;
use tweetai_types::RealtimeEvent;

/// Events buffered per subscriber before a slow client starts missing them
const CHANNEL_CAPACITY: usize = 64;

/// Fan-out of real-time events to every connected WebSocket client
#[derive(Clone)]
pub struct CountBroadcaster {
    sender: broadcast::Sender<RealtimeEvent>,
}

impl CountBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.sender.subscribe()
    }

    /// Publish the current autobot count, returning how many clients received it
    pub fn publish_autobot_count(&self, count: i64) -> usize {
        // send only fails when nobody is listening
        match self.sender.send(RealtimeEvent::AutobotCount { count }) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!("No real-time clients connected for autobot count {}", count);
                0
            }
        }
    }
}

impl Default for CountBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /ws - Upgrade to a WebSocket that receives real-time events
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let events = state.counts.subscribe();
    ws.on_upgrade(move |socket| forward_events(socket, events))
}

async fn forward_events(mut socket: WebSocket, mut events: broadcast::Receiver<RealtimeEvent>) {
    tracing::debug!("Real-time client connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to encode {} event: {}", event.name(), e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Real-time client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Clients have nothing to say; ignore anything else they send
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Real-time client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let broadcaster = CountBroadcaster::new();
        assert_eq!(broadcaster.publish_autobot_count(3), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_count() {
        let broadcaster = CountBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        assert_eq!(broadcaster.publish_autobot_count(7), 2);

        assert_eq!(first.recv().await.unwrap(), RealtimeEvent::AutobotCount { count: 7 });
        assert_eq!(second.recv().await.unwrap(), RealtimeEvent::AutobotCount { count: 7 });
    }
}
