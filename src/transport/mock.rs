//! Offline backend for demos and development.
//!
//! Sessions are minted locally and replies echo the user's message behind a
//! canned opener, streamed in small fragments with a short delay so the UI
//! behaves like it would against the real service.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use super::backend::{ChatBackend, ChatRequest, SessionError, TransportError};
use super::types::StreamEvent;

/// Openers prepended to the echoed message.
pub const MOCK_OPENERS: &[&str] = &[
    "That's an interesting question! ",
    "Let me think about that... ",
    "Here's what I think: ",
    "I appreciate you asking. ",
    "That's a great point. ",
];

/// Characters per streamed fragment.
const FRAGMENT_CHARS: usize = 5;
pub const DEFAULT_FRAGMENT_DELAY: Duration = Duration::from_millis(50);

pub struct MockBackend {
    fragment_delay: Duration,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            fragment_delay: DEFAULT_FRAGMENT_DELAY,
        }
    }

    /// Same backend with a custom delay between fragments (zero in tests).
    pub fn with_fragment_delay(fragment_delay: Duration) -> Self {
        Self { fragment_delay }
    }
}

/// Builds the full mock reply for a message. Deterministic per message.
pub fn mock_reply(message: &str) -> String {
    let opener = MOCK_OPENERS[message.chars().count() % MOCK_OPENERS.len()];
    format!("{opener}{message} (mock response)")
}

/// Splits text into fragments of at most `size` characters.
fn fragments(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_session(&self) -> Result<String, SessionError> {
        let session_id = format!("mock-session-{}", chrono::Utc::now().timestamp_millis());
        info!("Mock session created: {}", session_id);
        Ok(session_id)
    }

    async fn stream_reply(
        &self,
        request: ChatRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), TransportError> {
        let reply = mock_reply(request.message);
        let parts = fragments(&reply, FRAGMENT_CHARS);
        debug!(
            "Mock reply for session {}: {} fragments",
            request.session_id,
            parts.len()
        );

        for part in parts {
            if !self.fragment_delay.is_zero() {
                tokio::time::sleep(self.fragment_delay).await;
            }
            if sender.send(StreamEvent::Content(part)).await.is_err() {
                warn!("Mock fragment send failed: receiver dropped");
                return Err(TransportError::ChannelClosed);
            }
        }

        sender
            .send(StreamEvent::Completed)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_fragments_respect_char_boundaries() {
        assert_eq!(fragments("héllo wörld", 5), vec!["héllo", " wörl", "d"]);
        assert!(fragments("", 5).is_empty());
    }

    #[test]
    fn test_mock_reply_echoes_message() {
        let reply = mock_reply("how do I install the SDK?");
        assert!(reply.ends_with("how do I install the SDK? (mock response)"));
        assert!(MOCK_OPENERS.iter().any(|opener| reply.starts_with(opener)));
    }

    #[tokio::test]
    async fn test_mock_session_id_shape() {
        let backend = MockBackend::new();
        let id = backend.create_session().await.unwrap();
        assert!(id.starts_with("mock-session-"));
    }

    #[tokio::test]
    async fn test_mock_stream_reassembles_reply() {
        let backend = MockBackend::with_fragment_delay(Duration::ZERO);
        let (tx, mut rx) = mpsc::channel(256);
        let request = ChatRequest {
            session_id: "mock-session-1",
            message: "hi",
        };

        backend.stream_reply(request, tx).await.unwrap();

        let mut text = String::new();
        let mut completed = false;
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Content(part) => {
                    assert!(!completed, "content after completion");
                    assert!(part.chars().count() <= FRAGMENT_CHARS);
                    text.push_str(&part);
                }
                StreamEvent::Completed => completed = true,
            }
        }
        assert!(completed);
        assert_eq!(text, mock_reply("hi"));
    }
}
