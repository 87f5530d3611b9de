//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::sync::mpsc::Sender;

use crate::core::state::{App, SessionStatus};
use crate::transport::{ChatBackend, ChatRequest, SessionError, StreamEvent, TransportError};

/// One step of a scripted reply.
pub enum ScriptStep {
    Event(StreamEvent),
    Fail(TransportError),
    /// Park until the test notifies.
    Wait(Arc<Notify>),
}

/// A backend that plays back a fixed script and records what it was asked.
pub struct ScriptedBackend {
    session: Result<String, SessionError>,
    steps: Vec<ScriptStep>,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            session: Ok("test-session".to_string()),
            steps,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Streams `fragments` followed by a completion record.
    pub fn replying(fragments: &[&str]) -> Self {
        let mut steps: Vec<ScriptStep> = fragments
            .iter()
            .map(|f| ScriptStep::Event(StreamEvent::Content(f.to_string())))
            .collect();
        steps.push(ScriptStep::Event(StreamEvent::Completed));
        Self::new(steps)
    }

    pub fn with_session(mut self, session: Result<String, SessionError>) -> Self {
        self.session = session;
        self
    }

    /// `(session_id, message)` of every `stream_reply` call so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn create_session(&self) -> Result<String, SessionError> {
        self.session.clone()
    }

    async fn stream_reply(
        &self,
        request: ChatRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.session_id.to_string(), request.message.to_string()));

        for step in &self.steps {
            match step {
                ScriptStep::Event(event) => sender
                    .send(event.clone())
                    .await
                    .map_err(|_| TransportError::ChannelClosed)?,
                ScriptStep::Fail(err) => return Err(err.clone()),
                ScriptStep::Wait(gate) => gate.notified().await,
            }
        }
        Ok(())
    }
}

/// An `App` whose session is already established.
pub fn test_app() -> App {
    let mut app = App::new();
    app.session = SessionStatus::Ready("test-session".to_string());
    app
}
