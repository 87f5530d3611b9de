//! # Landing Page Component
//!
//! Shown in place of the message list while the conversation is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub const LANDING_TITLE: &str = "Chat Interface";
pub const LANDING_SUBTITLE: &str = "Start a conversation with our AI assistant";

pub struct LandingPage<'a> {
    palette: &'a Palette,
}

impl<'a> LandingPage<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(LANDING_TITLE, self.palette.heading())),
            Line::from(""),
            Line::from(Span::styled(LANDING_SUBTITLE, self.palette.dim())),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                self.palette.dim(),
            )),
        ];
        let height = lines.len() as u16;

        let [text_area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }
}
