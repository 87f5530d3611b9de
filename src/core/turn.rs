//! # Turns
//!
//! The I/O half of sending a message. `update()` decides that a turn should
//! run and returns `Effect::SpawnTurn`; [`run_turn`] then drives the backend
//! and turns every streamed event into an `Action`, in arrival order.
//!
//! ```text
//! backend.stream_reply() ──StreamEvent──► forward_events() ──Action──► Dispatcher
//!          │                                                             │
//!          └── Err(e) ──► StreamFailed ──► ResponseSettled (always) ─────┘
//! ```

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::core::action::Action;
use crate::core::dispatch::Dispatcher;
use crate::transport::{ChatBackend, ChatRequest, StreamEvent, TransportError};

/// Bound on stream events buffered between the backend and the forwarder.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// One message to stream a reply for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub session_id: String,
    pub message: String,
}

/// Runs one turn to completion. Never fails: every outcome becomes actions.
pub async fn run_turn(backend: Arc<dyn ChatBackend>, turn: TurnRequest, dispatcher: Dispatcher) {
    info!(
        "Starting turn via {} backend (session={})",
        backend.name(),
        turn.session_id
    );

    let (event_tx, event_rx) = mpsc::channel::<StreamEvent>(EVENT_CHANNEL_CAPACITY);
    let request = ChatRequest {
        session_id: &turn.session_id,
        message: &turn.message,
    };

    let (result, forwarded) = tokio::join!(
        backend.stream_reply(request, event_tx),
        forward_events(event_rx, &dispatcher),
    );

    match result {
        Ok(()) => info!("Turn finished: {} events forwarded", forwarded),
        // The forwarder hung up first (teardown); nothing to report.
        Err(TransportError::ChannelClosed) => {
            debug!("Turn abandoned after {} events", forwarded)
        }
        Err(e) => {
            warn!("Turn failed after {} events: {}", forwarded, e);
            dispatcher.dispatch(Action::StreamFailed(e.to_string()));
        }
    }

    dispatcher.dispatch(Action::ResponseSettled);
}

/// Forwards events until the backend is done or the chat is torn down.
/// Takes the receiver by value so that stopping early closes the channel
/// and the backend's next send fails.
async fn forward_events(mut events: mpsc::Receiver<StreamEvent>, dispatcher: &Dispatcher) -> usize {
    let mut forwarded = 0usize;
    loop {
        let event = tokio::select! {
            biased;
            _ = dispatcher.lifetime().cancelled() => {
                debug!("Teardown: dropping remaining stream events");
                break;
            }
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        let action = match event {
            StreamEvent::Content(text) => Action::ResponseChunk(text),
            StreamEvent::Completed => Action::ResponseCompleted,
        };
        if !dispatcher.dispatch(action) {
            break;
        }
        forwarded += 1;
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;

    use crate::core::action::{Effect, update};
    use crate::core::state::{App, StreamingPhase};
    use crate::test_support::{ScriptStep, ScriptedBackend, test_app};

    fn make_dispatcher() -> (Dispatcher, std_mpsc::Receiver<Action>, CancellationToken) {
        let (tx, rx) = std_mpsc::channel();
        let lifetime = CancellationToken::new();
        (Dispatcher::new(tx, lifetime.clone()), rx, lifetime)
    }

    /// Submits `text`, runs the turn against `backend` and applies every action.
    async fn send(app: &mut App, text: &str, backend: ScriptedBackend) {
        let Effect::SpawnTurn(turn) = update(app, Action::Submit(text.to_string())) else {
            panic!("Expected SpawnTurn");
        };
        let (dispatcher, rx, _lifetime) = make_dispatcher();
        run_turn(Arc::new(backend), turn, dispatcher).await;
        for action in rx.try_iter() {
            update(app, action);
        }
    }

    #[tokio::test]
    async fn test_successful_turn_fills_placeholder() {
        let mut app = test_app();
        let backend = ScriptedBackend::replying(&["Hel", "lo", " world"]);

        send(&mut app, "hi", backend).await;

        let bot = app.messages.last().unwrap();
        assert_eq!(bot.text, "Hello world");
        assert!(bot.complete);
        assert!(!app.error);
        assert_eq!(app.phase, StreamingPhase::Idle);
    }

    #[tokio::test]
    async fn test_turn_sends_message_and_session() {
        let mut app = test_app();
        let backend = Arc::new(ScriptedBackend::replying(&["ok"]));
        let Effect::SpawnTurn(turn) = update(&mut app, Action::Submit("hello".into())) else {
            panic!("Expected SpawnTurn");
        };
        let (dispatcher, _rx, _lifetime) = make_dispatcher();

        run_turn(backend.clone(), turn, dispatcher).await;

        assert_eq!(
            backend.requests(),
            vec![("test-session".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_sets_error_and_settles() {
        let mut app = test_app();
        let backend = ScriptedBackend::new(vec![
            ScriptStep::Event(StreamEvent::Content("Hel".into())),
            ScriptStep::Fail(TransportError::Network("connection reset".into())),
        ]);

        send(&mut app, "hi", backend).await;

        assert!(app.error);
        assert_eq!(app.phase, StreamingPhase::Idle);
        let bot = app.messages.last().unwrap();
        assert_eq!(bot.text, "Hel");
        assert!(!bot.complete);
    }

    #[tokio::test]
    async fn test_stream_without_completion_leaves_message_open() {
        let mut app = test_app();
        let backend = ScriptedBackend::new(vec![ScriptStep::Event(StreamEvent::Content(
            "cut short".into(),
        ))]);

        send(&mut app, "hi", backend).await;

        assert!(!app.error);
        assert_eq!(app.phase, StreamingPhase::Idle);
        assert!(!app.messages.last().unwrap().complete);
    }

    #[tokio::test]
    async fn test_settled_is_last_action() {
        let backend = Arc::new(ScriptedBackend::replying(&["a", "b"]));
        let (dispatcher, rx, _lifetime) = make_dispatcher();
        let turn = TurnRequest {
            session_id: "s".into(),
            message: "m".into(),
        };

        run_turn(backend, turn, dispatcher).await;

        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(
            actions,
            vec![
                Action::ResponseChunk("a".into()),
                Action::ResponseChunk("b".into()),
                Action::ResponseCompleted,
                Action::ResponseSettled,
            ]
        );
    }

    /// Teardown while a reply is mid-stream: nothing that arrives afterwards
    /// may reach the state.
    #[tokio::test]
    async fn test_fragments_after_teardown_are_discarded() {
        let mut app = test_app();
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend::new(vec![
            ScriptStep::Event(StreamEvent::Content("before".into())),
            ScriptStep::Wait(gate.clone()),
            ScriptStep::Event(StreamEvent::Content(" after".into())),
            ScriptStep::Event(StreamEvent::Completed),
        ]));
        let Effect::SpawnTurn(turn) = update(&mut app, Action::Submit("hi".into())) else {
            panic!("Expected SpawnTurn");
        };
        let (dispatcher, rx, lifetime) = make_dispatcher();

        let handle = tokio::spawn(run_turn(backend, turn, dispatcher));

        // Wait for the first fragment to land
        let first = loop {
            if let Ok(action) = rx.try_recv() {
                break action;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        };
        update(&mut app, first);
        let snapshot = app.messages.clone();
        let phase = app.phase;

        // Tear down, then let the backend continue
        lifetime.cancel();
        gate.notify_one();
        handle.await.unwrap();

        for action in rx.try_iter() {
            update(&mut app, action);
        }
        assert_eq!(app.messages, snapshot);
        assert_eq!(app.messages.last().unwrap().text, "before");
        assert_eq!(app.phase, phase);
    }
}
