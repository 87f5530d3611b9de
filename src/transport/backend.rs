use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::StreamEvent;

/// Why a chat session could not be created.
///
/// Either error ends the chat: the TUI swaps to a dedicated error view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The endpoint answered, but without a usable session id.
    CreationFailed,
    /// Network failure, non-success status, unreadable body, anything else.
    Unexpected(String),
}

impl SessionError {
    /// Text shown to the user in the session error view.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::CreationFailed => "Failed to create chat session. Please try again.",
            SessionError::Unexpected(_) => {
                "An unexpected error occurred. Please try again later."
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::CreationFailed => {
                write!(f, "session creation failed: no session id in response")
            }
            SessionError::Unexpected(msg) => write!(f, "unexpected session error: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Errors that can occur while streaming a reply.
/// All of them are recoverable: the turn is marked failed and can be retried.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Network-level failure (connection refused, reset, read error).
    Network(String),
    /// The chat endpoint returned a non-success status.
    Api { status: u16, message: String },
    /// The stream carried something that is not a valid record.
    Parse(String),
    /// The event channel was closed (the turn was torn down).
    ChannelClosed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TransportError::Parse(msg) => write!(f, "parse error: {msg}"),
            TransportError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Everything a backend needs to stream one bot reply.
pub struct ChatRequest<'a> {
    pub session_id: &'a str,
    pub message: &'a str,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the name of the backend, for logs.
    fn name(&self) -> &str;

    /// Creates a new conversation and returns its session id.
    async fn create_session(&self) -> Result<String, SessionError>;

    /// Streams the reply to `request.message`, sending events to `sender` in arrival order.
    async fn stream_reply(
        &self,
        request: ChatRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), TransportError>;
}
