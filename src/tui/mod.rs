//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration draws (when something changed), drains terminal events,
//! then drains actions sent by background tasks. Background tasks reach the
//! loop only through a [`Dispatcher`]; when the loop exits it cancels the
//! dispatcher's token so anything still in flight is dropped.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (loading spinner, reply streaming): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or new actions.

mod component;
mod components;
mod event;
mod theme;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio_util::sync::CancellationToken;

use crate::BackendKind;
use crate::Theme;
use crate::core::action::{Action, Effect, update};
use crate::core::bootstrap::bootstrap_session;
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::Dispatcher;
use crate::core::state::{App, SessionStatus};
use crate::core::turn::run_turn;
use crate::transport::{ChatBackend, HttpBackend, MockBackend};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Palette;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub palette: Palette,
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(theme: Theme) -> Self {
        let palette = Palette::for_theme(theme);
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(palette),
            palette,
            spinner_frame: 0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build a backend from the resolved config.
pub fn build_backend(config: &ResolvedConfig) -> Arc<dyn ChatBackend> {
    match config.backend {
        BackendKind::Http => Arc::new(HttpBackend::new(
            config.session_url.clone(),
            config.chat_url.clone(),
        )),
        BackendKind::Mock => Arc::new(MockBackend::new()),
    }
}

/// Carries out an effect returned by `update()`. Returns true to quit.
fn apply_effect(effect: Effect, backend: &Arc<dyn ChatBackend>, dispatcher: &Dispatcher) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnTurn(turn) => {
            info!("Spawning turn ({} bytes)", turn.message.len());
            tokio::spawn(run_turn(backend.clone(), turn, dispatcher.clone()));
            false
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = build_backend(&config);
    info!(
        "Using {} backend (session={}, chat={})",
        backend.name(),
        config.session_url,
        config.chat_url
    );

    let mut app = App::new();
    let mut tui = TuiState::new(config.theme);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let lifetime = CancellationToken::new();
    let dispatcher = Dispatcher::new(tx, lifetime.clone());

    // Exactly one bootstrap per run
    tokio::spawn(bootstrap_session(backend.clone(), dispatcher.clone()));

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        let animating = matches!(app.session, SessionStatus::Loading) || !app.phase.is_idle();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Resize => {}
                TuiEvent::Quit => {
                    should_quit |= apply_effect(update(&mut app, Action::Quit), &backend, &dispatcher);
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                }
                TuiEvent::Retry => {
                    if app.retry_available() {
                        // A fresh reply should be followed
                        tui.message_list.stick_to_bottom = true;
                        should_quit |=
                            apply_effect(update(&mut app, Action::Retry), &backend, &dispatcher);
                    } else {
                        debug!("Retry ignored: nothing to retry");
                    }
                }
                _ => {
                    tui.input_box.disabled = !app.input_enabled();
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        tui.message_list.stick_to_bottom = true;
                        should_quit |=
                            apply_effect(update(&mut app, Action::Submit(text)), &backend, &dispatcher);
                    }
                }
            }
        }

        if should_quit {
            break Ok(());
        }

        // Handle background task actions (session result, streaming reply)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            should_quit |= apply_effect(effect, &backend, &dispatcher);
        }

        if should_quit {
            break Ok(());
        }
    };

    // Teardown: whatever is still streaming must not reach `app` any more
    lifetime.cancel();
    info!("Chat torn down ({} messages)", app.messages.len());

    ratatui::restore();
    result
}
