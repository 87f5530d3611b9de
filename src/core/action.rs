//! # Actions
//!
//! Everything that can happen in the chat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! A fragment arrives? That's `Action::ResponseChunk(text)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state and returns an `Effect` for the caller to carry out.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Phase transitions:
//!
//! ```text
//! Idle ──Submit──► Streaming ──ResponseSettled──► Idle
//! Idle ──Retry───► Retrying  ──ResponseSettled──► Idle
//! ```
//!
//! Submit and Retry are rejected outside `Idle`, so two turns never stream
//! into the same log.

use log::{debug, info, warn};

use crate::core::state::{App, Message, Role, SessionStatus, StreamingPhase};
use crate::core::turn::TurnRequest;
use crate::transport::SessionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The bootstrapper obtained a session id.
    SessionCreated(String),
    /// The bootstrapper gave up.
    SessionFailed(SessionError),
    /// The user sent a message.
    Submit(String),
    /// The user asked to re-run the last turn.
    Retry,
    /// A fragment of the bot reply arrived.
    ResponseChunk(String),
    /// The service signalled the end of the bot reply.
    ResponseCompleted,
    /// The turn failed; the reason is shown in the status bar.
    StreamFailed(String),
    /// The turn is over, whatever the outcome.
    ResponseSettled,
    Quit,
}

/// What the caller must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start streaming a reply for this turn.
    SpawnTurn(TurnRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SessionCreated(session_id) => {
            if !matches!(app.session, SessionStatus::Loading) {
                warn!("Ignoring session {} - session already settled", session_id);
                return Effect::None;
            }
            info!("Session ready: {}", session_id);
            app.session = SessionStatus::Ready(session_id);
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::SessionFailed(err) => {
            if !matches!(app.session, SessionStatus::Loading) {
                warn!("Ignoring session failure - session already settled: {}", err);
                return Effect::None;
            }
            warn!("Session bootstrap failed: {}", err);
            app.status_message = err.user_message().to_string();
            app.session = SessionStatus::Failed(err);
            Effect::None
        }
        Action::Submit(text) => {
            let Some(session_id) = app.session.session_id().map(str::to_string) else {
                debug!("Submit ignored: no session");
                return Effect::None;
            };
            if !app.phase.is_idle() {
                debug!("Submit ignored: phase is {:?}", app.phase);
                return Effect::None;
            }
            if text.trim().is_empty() {
                debug!("Submit ignored: blank message");
                return Effect::None;
            }

            // A failed or truncated reply stays as it is but stops being open.
            if let Some(last) = app.messages.last_mut()
                && last.is_in_progress()
            {
                debug!("Closing unfinished bot message {}", last.id);
                last.complete = true;
            }

            app.error = false;
            app.messages.push(Message::user(text.clone()));
            app.phase = StreamingPhase::Streaming;
            app.messages.push(Message::bot_placeholder());
            app.status_message = app.phase.label().to_string();
            Effect::SpawnTurn(TurnRequest {
                session_id,
                message: text,
            })
        }
        Action::Retry => {
            let Some(session_id) = app.session.session_id().map(str::to_string) else {
                debug!("Retry ignored: no session");
                return Effect::None;
            };
            if !app.phase.is_idle() {
                debug!("Retry ignored: phase is {:?}", app.phase);
                return Effect::None;
            }

            if let Some(removed) = app.messages.pop() {
                debug!("Retry removed trailing {:?} message {}", removed.role, removed.id);
            }
            let Some(message) = app.last_user_message().map(str::to_string) else {
                debug!("Retry: no user message to re-send");
                return Effect::None;
            };

            info!("Retrying last user message ({} bytes)", message.len());
            app.error = false;
            app.phase = StreamingPhase::Retrying;
            app.messages.push(Message::bot_placeholder());
            app.status_message = app.phase.label().to_string();
            Effect::SpawnTurn(TurnRequest {
                session_id,
                message,
            })
        }
        Action::ResponseChunk(text) => {
            if text.is_empty() {
                return Effect::None;
            }
            // Only the trailing, still-open bot message may grow.
            match app.messages.last_mut() {
                Some(last) if last.is_in_progress() => last.text.push_str(&text),
                _ => debug!("Dropping fragment ({} bytes): no open bot message", text.len()),
            }
            Effect::None
        }
        Action::ResponseCompleted => {
            if let Some(last) = app.messages.last_mut()
                && last.role == Role::Bot
            {
                last.complete = true;
            }
            Effect::None
        }
        Action::StreamFailed(reason) => {
            warn!("Turn failed: {}", reason);
            app.error = true;
            app.status_message = format!("Error: {reason}");
            Effect::None
        }
        Action::ResponseSettled => {
            app.phase = StreamingPhase::Idle;
            if !app.error {
                app.status_message = app.phase.label().to_string();
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    fn submit(app: &mut App, text: &str) -> Effect {
        update(app, Action::Submit(text.to_string()))
    }

    fn stream(app: &mut App, fragments: &[&str]) {
        for fragment in fragments {
            update(app, Action::ResponseChunk(fragment.to_string()));
        }
        update(app, Action::ResponseCompleted);
        update(app, Action::ResponseSettled);
    }

    #[test]
    fn test_submit_appends_user_and_placeholder() {
        let mut app = test_app();
        let effect = submit(&mut app, "hi");

        assert_eq!(
            effect,
            Effect::SpawnTurn(TurnRequest {
                session_id: "test-session".into(),
                message: "hi".into(),
            })
        );
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[0].role, Role::User);
        assert_eq!(app.messages[0].text, "hi");
        assert!(app.messages[0].complete);
        assert!(app.messages[1].is_in_progress());
        assert!(app.messages[1].text.is_empty());
        assert_eq!(app.phase, StreamingPhase::Streaming);
    }

    #[test]
    fn test_submit_clears_previous_error() {
        let mut app = test_app();
        app.error = true;
        submit(&mut app, "hi");
        assert!(!app.error);
    }

    #[test]
    fn test_each_successful_send_grows_log_by_two() {
        let mut app = test_app();
        for (n, text) in ["one", "two", "three"].iter().enumerate() {
            let before = app.messages.len();
            if let Some(previous) = app.messages.last() {
                assert!(previous.complete, "bot message {n} not complete before next send");
            }
            submit(&mut app, text);
            stream(&mut app, &["reply ", text]);
            assert_eq!(app.messages.len(), before + 2);
        }
        assert!(app.messages.iter().all(|m| m.complete));
        assert_eq!(app.messages[5].text, "reply three");
    }

    #[test]
    fn test_fragments_fold_in_arrival_order() {
        let mut app = test_app();
        submit(&mut app, "greet me");
        stream(&mut app, &["Hel", "lo", " world"]);

        let bot = app.messages.last().unwrap();
        assert_eq!(bot.text, "Hello world");
        assert!(bot.complete);
        assert_eq!(app.phase, StreamingPhase::Idle);
    }

    #[test]
    fn test_second_completion_is_noop() {
        let mut app = test_app();
        submit(&mut app, "hi");
        update(&mut app, Action::ResponseChunk("done".into()));
        update(&mut app, Action::ResponseCompleted);
        update(&mut app, Action::ResponseCompleted);

        let bot = app.messages.last().unwrap();
        assert_eq!(bot.text, "done");
        assert!(bot.complete);
        assert_eq!(app.messages.len(), 2);
    }

    #[test]
    fn test_fragment_never_touches_user_message() {
        let mut app = test_app();
        app.messages.push(Message::user("question".into()));

        update(&mut app, Action::ResponseChunk("stray".into()));
        update(&mut app, Action::ResponseCompleted);

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].text, "question");
    }

    #[test]
    fn test_fragment_after_completion_is_dropped() {
        let mut app = test_app();
        submit(&mut app, "hi");
        stream(&mut app, &["answer"]);
        update(&mut app, Action::ResponseChunk(" late".into()));
        assert_eq!(app.messages.last().unwrap().text, "answer");
    }

    #[test]
    fn test_submit_rejected_while_streaming() {
        let mut app = test_app();
        submit(&mut app, "first");
        let effect = submit(&mut app, "second");

        assert_eq!(effect, Effect::None);
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.phase, StreamingPhase::Streaming);
    }

    #[test]
    fn test_submit_rejected_without_session() {
        let mut app = App::new();
        assert_eq!(submit(&mut app, "hi"), Effect::None);
        assert!(app.messages.is_empty());
    }

    #[test]
    fn test_blank_submit_rejected() {
        let mut app = test_app();
        assert_eq!(submit(&mut app, "   \n"), Effect::None);
        assert!(app.messages.is_empty());
        assert_eq!(app.phase, StreamingPhase::Idle);
    }

    #[test]
    fn test_stream_failure_sets_error_and_returns_to_idle() {
        let mut app = test_app();
        submit(&mut app, "hi");
        update(&mut app, Action::ResponseChunk("partial".into()));
        update(&mut app, Action::StreamFailed("network error: reset".into()));
        update(&mut app, Action::ResponseSettled);

        assert!(app.error);
        assert_eq!(app.phase, StreamingPhase::Idle);
        assert!(app.status_message.contains("network error"));
        assert!(app.retry_available());
        let bot = app.messages.last().unwrap();
        assert_eq!(bot.text, "partial");
        assert!(!bot.complete);
    }

    fn open_bot_messages(app: &App) -> Vec<usize> {
        app.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_in_progress())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_submit_after_failure_closes_failed_reply() {
        let mut app = test_app();
        submit(&mut app, "first");
        update(&mut app, Action::ResponseChunk("partial".into()));
        update(&mut app, Action::StreamFailed("boom".into()));
        update(&mut app, Action::ResponseSettled);

        submit(&mut app, "second");

        assert_eq!(open_bot_messages(&app), vec![3]);
        assert!(app.messages[1].complete);
        assert_eq!(app.messages[1].text, "partial");
        assert!(!app.error);
    }

    #[test]
    fn test_submit_after_truncated_stream_closes_reply() {
        let mut app = test_app();
        submit(&mut app, "first");
        update(&mut app, Action::ResponseChunk("cut o".into()));
        // No completion record before the stream ended
        update(&mut app, Action::ResponseSettled);

        submit(&mut app, "second");
        update(&mut app, Action::ResponseChunk("late".into()));

        assert_eq!(open_bot_messages(&app), vec![3]);
        assert_eq!(app.messages[1].text, "cut o");
        assert_eq!(app.messages[3].text, "late");
    }

    #[test]
    fn test_retry_replaces_trailing_bot_message() {
        let mut app = test_app();
        submit(&mut app, "hi");
        update(&mut app, Action::StreamFailed("boom".into()));
        update(&mut app, Action::ResponseSettled);
        let failed_id = app.messages[1].id.clone();

        let effect = update(&mut app, Action::Retry);

        assert_eq!(
            effect,
            Effect::SpawnTurn(TurnRequest {
                session_id: "test-session".into(),
                message: "hi".into(),
            })
        );
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[0].role, Role::User);
        assert_eq!(app.messages[0].text, "hi");
        assert!(app.messages[1].is_in_progress());
        assert!(app.messages[1].text.is_empty());
        assert_ne!(app.messages[1].id, failed_id);
        assert_eq!(app.phase, StreamingPhase::Retrying);
        assert!(!app.error);
    }

    #[test]
    fn test_retry_resends_most_recent_user_text() {
        let mut app = test_app();
        submit(&mut app, "first");
        stream(&mut app, &["ok"]);
        submit(&mut app, "second");
        update(&mut app, Action::StreamFailed("boom".into()));
        update(&mut app, Action::ResponseSettled);

        match update(&mut app, Action::Retry) {
            Effect::SpawnTurn(turn) => assert_eq!(turn.message, "second"),
            other => panic!("Expected SpawnTurn, got {:?}", other),
        }
        assert_eq!(app.messages.len(), 4);
    }

    #[test]
    fn test_retry_on_empty_log_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Retry), Effect::None);
        assert!(app.messages.is_empty());
        assert_eq!(app.phase, StreamingPhase::Idle);
    }

    #[test]
    fn test_retry_rejected_while_streaming() {
        let mut app = test_app();
        submit(&mut app, "hi");
        assert_eq!(update(&mut app, Action::Retry), Effect::None);
        assert_eq!(app.messages.len(), 2);
    }

    #[test]
    fn test_retry_settles_back_to_idle() {
        let mut app = test_app();
        submit(&mut app, "hi");
        update(&mut app, Action::StreamFailed("boom".into()));
        update(&mut app, Action::ResponseSettled);
        update(&mut app, Action::Retry);
        stream(&mut app, &["second try"]);

        assert_eq!(app.phase, StreamingPhase::Idle);
        assert_eq!(app.messages.last().unwrap().text, "second try");
        assert!(app.messages.last().unwrap().complete);
    }

    #[test]
    fn test_session_is_set_once() {
        let mut app = App::new();
        update(&mut app, Action::SessionCreated("abc".into()));
        update(&mut app, Action::SessionCreated("other".into()));
        update(&mut app, Action::SessionFailed(SessionError::CreationFailed));
        assert_eq!(app.session, SessionStatus::Ready("abc".into()));
    }

    #[test]
    fn test_session_failure_is_terminal() {
        let mut app = App::new();
        update(&mut app, Action::SessionFailed(SessionError::CreationFailed));
        assert_eq!(app.session, SessionStatus::Failed(SessionError::CreationFailed));
        assert_eq!(
            app.status_message,
            "Failed to create chat session. Please try again."
        );
        assert!(!app.input_enabled());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
