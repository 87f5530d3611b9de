use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{Message, Role};
use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Shown in a bot message that has not received its first fragment yet.
pub const TYPING_PLACEHOLDER: &str = "...";
pub const RETRY_HINT: &str = "↻ Retry (Ctrl+R)";

/// A stateless component that renders one entry of the conversation log.
///
/// Created fresh each frame by `MessageList`. The retry hint is a prop: the
/// list decides which message (if any) carries it.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    pub palette: &'a Palette,
    pub show_retry: bool,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message, palette: &'a Palette, show_retry: bool) -> Self {
        Self {
            message,
            palette,
            show_retry,
        }
    }

    /// The text actually drawn inside the border.
    fn display_text(message: &Message) -> &str {
        let content = message.text.trim();
        if content.is_empty() && message.is_in_progress() {
            TYPING_PLACEHOLDER
        } else {
            content
        }
    }

    /// Predicts the rendered height at `width` without rendering.
    ///
    /// The wrapping options must match `Paragraph`'s so that the scroll
    /// canvas lines up with what is drawn.
    pub fn calculate_height(message: &Message, width: u16, show_retry: bool) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let retry_lines = u16::from(show_retry);
        let content = Self::display_text(message);
        if content.is_empty() {
            return VERTICAL_OVERHEAD + retry_lines;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD + retry_lines
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Bot => "Assistant",
    }
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let color = match self.message.role {
            Role::User => self.palette.user,
            Role::Bot => self.palette.bot,
        };
        let style = Style::default().fg(self.palette.text);
        let mut border_style = Style::default().fg(color);
        if !self.message.is_in_progress() {
            border_style = border_style.add_modifier(Modifier::DIM);
        }

        let timestamp = self
            .message
            .created_at
            .with_timezone(&Local)
            .format("%H:%M");
        let title = format!(" {} · {} ", role_label(self.message.role), timestamp);

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let content = Self::display_text(self.message);
        let content_style = if content == TYPING_PLACEHOLDER && self.message.text.is_empty() {
            self.palette.dim()
        } else {
            style
        };

        let mut lines: Vec<Line> = Vec::new();
        if !content.is_empty() {
            lines.extend(
                content
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), content_style))),
            );
        }

        let body_height = if self.show_retry {
            inner_area.height.saturating_sub(1)
        } else {
            inner_area.height
        };
        let body_area = Rect {
            height: body_height,
            ..inner_area
        };
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(body_area, buf);

        if self.show_retry && inner_area.height > 0 {
            let hint_area = Rect {
                y: inner_area.y + body_height,
                height: 1,
                ..inner_area
            };
            Paragraph::new(Span::styled(
                RETRY_HINT,
                Style::default()
                    .fg(self.palette.error)
                    .add_modifier(Modifier::BOLD),
            ))
            .render(hint_area, buf);
        }
    }
}

impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
