//! # TitleBar Component
//!
//! Top status bar: widget name, status line, and a "↓ New" indicator when
//! the user has scrolled away from a growing reply.
//!
//! Stateless. All three props come from different places: the title is fixed,
//! `status_message` is core `App` state and `has_unseen_content` is TUI
//! scroll state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub const TITLE: &str = "Docs Chat";

pub struct TitleBar<'a> {
    pub status_message: &'a str,
    pub has_unseen_content: bool,
    /// Draw the status in the error color.
    pub is_error: bool,
    pub palette: &'a Palette,
}

impl<'a> TitleBar<'a> {
    pub fn new(
        status_message: &'a str,
        has_unseen_content: bool,
        is_error: bool,
        palette: &'a Palette,
    ) -> Self {
        Self {
            status_message,
            has_unseen_content,
            is_error,
            palette,
        }
    }
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(TITLE, self.palette.heading())];

        if !self.status_message.is_empty() {
            let status_style = if self.is_error {
                Style::default().fg(self.palette.error)
            } else {
                self.palette.dim()
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.status_message, status_style));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("↓ New", Style::default().fg(self.palette.accent)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
