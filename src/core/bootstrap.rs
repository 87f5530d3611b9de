//! # Session Bootstrap
//!
//! Runs once, before the first frame: asks the backend for a session and
//! reports the outcome as an action. The event loop spawns it exactly once;
//! `update()` additionally ignores any session result after the first.

use std::sync::Arc;

use log::{info, warn};

use crate::core::action::Action;
use crate::core::dispatch::Dispatcher;
use crate::transport::{ChatBackend, SessionError};

pub async fn bootstrap_session(backend: Arc<dyn ChatBackend>, dispatcher: Dispatcher) {
    info!("Bootstrapping chat session via {} backend", backend.name());

    let action = match backend.create_session().await {
        Ok(session_id) if session_id.trim().is_empty() => {
            warn!("Backend returned an empty session id");
            Action::SessionFailed(SessionError::CreationFailed)
        }
        Ok(session_id) => Action::SessionCreated(session_id),
        Err(e) => {
            warn!("Error creating chat session: {}", e);
            Action::SessionFailed(e)
        }
    };

    dispatcher.dispatch(action);
}
