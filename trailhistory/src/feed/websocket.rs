//! WebSocket feed.
//!
//! The backend pushes one JSON text frame per child event:
//!
//! ```json
//! {"event": "child_added", "key": "-Kx1", "value": {"uid": "...", ...}}
//! ```
//!
//! `event` is one of `child_added`, `child_changed`, `child_removed`. The
//! connection is opened on subscribe and closed when the subscription is
//! cancelled. There is no reconnection: when the socket closes the
//! subscription ends.

use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{Feed, FeedError, FeedEvent, FeedEventKind, FeedSubscription};

#[derive(Debug, Deserialize)]
struct WireMessage {
    event: String,
    key: Option<String>,
    value: Value,
}

/// Parse one text frame into a feed event.
///
/// When `key` is absent the record's `uid` is used as the key.
///
/// # Examples
///
/// ```
/// use trailhistory::feed::{parse_wire_message, FeedEventKind};
///
/// let event = parse_wire_message(r#"{"event":"child_removed","value":{"uid":"a"}}"#).unwrap();
/// assert_eq!(event.kind, FeedEventKind::Removed);
/// assert_eq!(event.key, "a");
/// ```
pub fn parse_wire_message(text: &str) -> Result<FeedEvent, FeedError> {
    let message: WireMessage =
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;

    let kind = match message.event.as_str() {
        "child_added" => FeedEventKind::Added,
        "child_changed" => FeedEventKind::Changed,
        "child_removed" => FeedEventKind::Removed,
        other => return Err(FeedError::Format(format!("unknown event '{}'", other))),
    };

    let key = message
        .key
        .or_else(|| {
            message
                .value
                .get("uid")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .ok_or_else(|| FeedError::Format("event has neither key nor uid".to_string()))?;

    Ok(FeedEvent::new(kind, key, message.value))
}

/// Feed that observes a backend over a WebSocket.
#[derive(Debug, Clone)]
pub struct WebSocketFeed {
    url: String,
}

impl WebSocketFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Feed for WebSocketFeed {
    fn name(&self) -> String {
        format!("websocket:{}", self.url)
    }

    fn subscribe(&self) -> Result<FeedSubscription, FeedError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| FeedError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        handle.spawn(run_socket(self.url.clone(), tx, cancel.clone()));

        Ok(FeedSubscription::new(rx, cancel))
    }
}

async fn run_socket(url: String, tx: mpsc::UnboundedSender<FeedEvent>, cancel: CancellationToken) {
    let connect = tokio::select! {
        _ = cancel.cancelled() => return,
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
    };

    let mut stream = match connect {
        Ok((stream, _response)) => {
            info!(url = %url, "Connected to POI feed");
            stream
        }
        Err(e) => {
            let error = FeedError::Connect {
                url: url.clone(),
                reason: e.to_string(),
            };
            warn!(error = %error, "POI feed unavailable");
            return;
        }
    };

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(url = %url, "POI feed observation cancelled");
                break;
            }
            frame = stream.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => match parse_wire_message(&text) {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring malformed feed frame"),
            },
            Some(Ok(Message::Close(_))) | None => {
                info!(url = %url, "POI feed closed by server");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!(url = %url, error = %e, "POI feed connection error");
                break;
            }
        }
    }

    let _ = stream.close(None).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_added() {
        let event = parse_wire_message(
            r#"{"event":"child_added","key":"k","value":{"uid":"a","name":"A"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, FeedEventKind::Added);
        assert_eq!(event.key, "k");
        assert_eq!(event.value, json!({"uid": "a", "name": "A"}));
    }

    #[test]
    fn test_parse_changed_uses_uid_as_key() {
        let event =
            parse_wire_message(r#"{"event":"child_changed","value":{"uid":"a"}}"#).unwrap();
        assert_eq!(event.kind, FeedEventKind::Changed);
        assert_eq!(event.key, "a");
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        assert!(matches!(
            parse_wire_message(r#"{"event":"value","value":{}}"#),
            Err(FeedError::Format(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        assert!(matches!(
            parse_wire_message(r#"{"event":"child_added","value":{"name":"A"}}"#),
            Err(FeedError::Format(_))
        ));
        assert!(matches!(
            parse_wire_message("not json"),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_subscribe_outside_runtime() {
        let feed = WebSocketFeed::new("ws://127.0.0.1:9/feed");
        assert!(matches!(feed.subscribe(), Err(FeedError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_unreachable_server_ends_subscription() {
        let feed = WebSocketFeed::new("ws://127.0.0.1:9/feed");
        let mut sub = feed.subscribe().unwrap();
        assert!(sub.next().await.is_none());
    }
}
