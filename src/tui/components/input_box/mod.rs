//! # InputBox Component
//!
//! Single-line message editor.
//!
//! ## State Management
//!
//! The buffer is internal state. `disabled` is a prop from the application
//! state: while a reply is streaming (or there is no session) the box ignores
//! input and hides the cursor. Cursor position and horizontal scroll are
//! encapsulated in `CursorState`.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

use cursor::{CursorState, next_char_boundary, prev_char_boundary};

/// Borders (1 left + 1 right).
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Total height: one text row plus top and bottom border.
pub const INPUT_HEIGHT: u16 = 3;

pub const PLACEHOLDER: &str = "Ask a question about the docs...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether input is currently refused (Prop)
    pub disabled: bool,
    palette: Palette,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(palette: Palette) -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            palette,
            cursor: CursorState::new(),
        }
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = self.palette;
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.cursor.update_scroll(&self.buffer, width);

        let (title, border_style) = if self.disabled {
            (" Waiting for reply... ", palette.dim())
        } else {
            (" Message ", Style::default().fg(palette.user))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);

        let content = if self.buffer.is_empty() && !self.disabled {
            Span::styled(PLACEHOLDER, palette.dim())
        } else {
            Span::styled(
                self.cursor.visible(&self.buffer, width),
                Style::default().fg(palette.text),
            )
        };
        frame.render_widget(Paragraph::new(content).block(block), area);

        if !self.disabled && width > 0 {
            let column = self.cursor.column(&self.buffer) - self.cursor.scroll;
            let x = area.x + 1 + column as u16;
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) if !c.is_control() => {
                let mut utf8 = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut utf8));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line editor: flatten line breaks
                let flattened: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
                    .filter(|c| !c.is_control())
                    .collect();
                self.insert_str(&flattened);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => self
                .cursor
                .move_left(&self.buffer)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorRight => self
                .cursor
                .move_right(&self.buffer)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorHome => self.cursor.move_home().then_some(InputEvent::ContentChanged),
            TuiEvent::CursorEnd => self
                .cursor
                .move_end(&self.buffer)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor.reset();
                    Some(InputEvent::Submit(text))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
