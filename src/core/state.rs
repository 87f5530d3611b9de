//! # Application State
//!
//! Core chat state. Domain logic only, no TUI types. Presentation state
//! lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionStatus       // Loading | Ready(id) | Failed(err)
//! ├── messages: Vec<Message>       // append-only conversation log
//! ├── phase: StreamingPhase        // Idle | Streaming | Retrying
//! ├── error: bool                  // last turn failed, retry offered
//! └── status_message: String       // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use chrono::{DateTime, Utc};

use crate::transport::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One entry of the conversation log.
///
/// User messages are created complete. A bot message starts as an empty,
/// incomplete placeholder and grows as fragments are folded into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub complete: bool,
}

impl Message {
    pub fn user(text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            text,
            created_at: Utc::now(),
            complete: true,
        }
    }

    pub fn bot_placeholder() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Bot,
            text: String::new(),
            created_at: Utc::now(),
            complete: false,
        }
    }

    /// True for a bot message still receiving fragments.
    pub fn is_in_progress(&self) -> bool {
        self.role == Role::Bot && !self.complete
    }
}

/// Coarse activity of the chat. Anything other than `Idle` disables input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamingPhase {
    #[default]
    Idle,
    /// A reply to a freshly submitted message is streaming.
    Streaming,
    /// A reply is being re-streamed after a retry.
    Retrying,
}

impl StreamingPhase {
    pub fn is_idle(self) -> bool {
        self == StreamingPhase::Idle
    }

    pub fn label(self) -> &'static str {
        match self {
            StreamingPhase::Idle => "Ready",
            StreamingPhase::Streaming => "Streaming...",
            StreamingPhase::Retrying => "Retrying...",
        }
    }
}

/// Lifecycle of the conversation session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Ready(String),
    Failed(SessionError),
}

impl SessionStatus {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            SessionStatus::Ready(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

pub struct App {
    pub session: SessionStatus,
    pub messages: Vec<Message>,
    pub phase: StreamingPhase,
    pub error: bool,
    pub status_message: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            session: SessionStatus::Loading,
            messages: Vec::new(),
            phase: StreamingPhase::Idle,
            error: false,
            status_message: String::from("Connecting..."),
        }
    }

    /// Text of the most recent user message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.text.as_str())
    }

    /// Whether the user may submit a message right now.
    pub fn input_enabled(&self) -> bool {
        self.phase.is_idle() && self.session.session_id().is_some()
    }

    /// Whether the retry affordance is shown. It is attached to the last
    /// message, which must be the failed bot reply.
    pub fn retry_available(&self) -> bool {
        self.error
            && self.phase.is_idle()
            && self.messages.last().is_some_and(|m| m.role == Role::Bot)
    }
}
