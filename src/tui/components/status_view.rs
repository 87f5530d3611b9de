//! Full-screen views shown instead of the chat while there is no session:
//! a spinner during bootstrap and the error screen when it failed.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::theme::Palette;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const LOADING_TEXT: &str = "Connecting to chat service...";

pub struct LoadingView<'a> {
    pub spinner_frame: usize,
    pub palette: &'a Palette,
}

impl<'a> Component for LoadingView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        let line = Line::from(vec![
            Span::styled(spinner, Style::default().fg(self.palette.accent)),
            Span::raw(" "),
            Span::styled(LOADING_TEXT, self.palette.dim()),
        ]);

        let [row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
    }
}

pub struct SessionErrorView<'a> {
    pub message: &'a str,
    pub palette: &'a Palette,
}

impl<'a> Component for SessionErrorView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let error_style = Style::default().fg(self.palette.error);
        let lines = vec![
            Line::from(Span::styled(
                self.message,
                error_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Press Esc to quit.", self.palette.dim())),
        ];

        let [column] = Layout::horizontal([Constraint::Max(60)])
            .flex(Flex::Center)
            .areas(area);
        let [block_area] = Layout::vertical([Constraint::Length(lines.len() as u16 + 2)])
            .flex(Flex::Center)
            .areas(column);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(" Error ")
                    .border_type(BorderType::Rounded)
                    .border_style(error_style),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, block_area);
    }
}
