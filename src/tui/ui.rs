use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::state::{App, SessionStatus};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    INPUT_HEIGHT, LandingPage, LoadingView, MessageList, SessionErrorView, TitleBar,
};
use crate::tui::theme::Palette;

pub const DISCLAIMER: &str =
    "AI responses may be inaccurate. Don't share sensitive or personal information.";
const KEY_HINTS: &str = "Enter send · Ctrl+R retry · ↑↓ scroll · End latest · Esc quit";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let palette = tui.palette;
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    match &app.session {
        SessionStatus::Loading => {
            let [title_area, main_area] = title_split(frame.area());
            draw_title(frame, title_area, app, tui);
            LoadingView {
                spinner_frame: tui.spinner_frame,
                palette: &palette,
            }
            .render(frame, main_area);
        }
        SessionStatus::Failed(err) => {
            let [title_area, main_area] = title_split(frame.area());
            draw_title(frame, title_area, app, tui);
            SessionErrorView {
                message: err.user_message(),
                palette: &palette,
            }
            .render(frame, main_area);
        }
        SessionStatus::Ready(_) => draw_chat(frame, app, tui),
    }
}

fn title_split(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area)
}

fn draw_title(frame: &mut Frame, area: Rect, app: &App, tui: &TuiState) {
    TitleBar::new(
        &app.status_message,
        tui.message_list.has_unseen_content(),
        app.error || matches!(app.session, SessionStatus::Failed(_)),
        &tui.palette,
    )
    .render(frame, area);
}

fn draw_chat(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT), Length(2)]);
    let [title_area, main_area, input_area, footer_area] = layout.areas(frame.area());

    let palette = tui.palette;

    if app.messages.is_empty() {
        LandingPage::new(&palette).render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.messages,
            &palette,
            app.retry_available(),
        )
        .render(frame, main_area);
    }

    // Title after the list so the unseen-content flag reflects this frame
    draw_title(frame, title_area, app, tui);

    tui.input_box.disabled = !app.input_enabled();
    tui.input_box.render(frame, input_area);

    draw_footer(frame, footer_area, &palette);
}

fn draw_footer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(DISCLAIMER, palette.dim())),
        Line::from(Span::styled(KEY_HINTS, palette.dim())),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
