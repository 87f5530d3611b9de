//! # MessageList Component
//!
//! Scrollable view of the conversation log.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the messages (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Whether content exists below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub palette: &'a Palette,
    /// Draw the retry hint on the last message.
    pub show_retry: bool,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        palette: &'a Palette,
        show_retry: bool,
    ) -> Self {
        Self {
            state,
            messages,
            palette,
            show_retry,
        }
    }

    fn retry_on(&self, index: usize) -> bool {
        self.show_retry && index + 1 == self.messages.len()
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_items = self.messages.len();

        // 1. Update layout cache
        let reusable = self.state.layout.reusable_count(num_items, content_width);
        self.state.layout.heights.truncate(reusable);
        for i in self.state.layout.heights.len()..num_items {
            let height =
                MessageView::calculate_height(&self.messages[i], content_width, self.retry_on(i));
            self.state.layout.heights.push(height);
        }
        self.state.layout.rebuild_prefix_heights();
        self.state.layout.update_metadata(num_items, content_width);

        let total_height = self.state.layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, self.state.layout.top_of(i), content_width, height);
            let view = MessageView::new(&self.messages[i], self.palette, self.retry_on(i));
            scroll_view.render_widget(view, rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
///
/// The log is append-only apart from the trailing message, which grows while
/// streaming and is replaced on retry. Every height but the last cached one
/// stays valid until the width changes or the log shrinks.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if message_count < self.message_count {
            return 0;
        }
        self.heights.len().min(self.message_count).saturating_sub(1)
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    /// First row of message `index` on the scroll canvas.
    pub fn top_of(&self, index: usize) -> u16 {
        index
            .checked_sub(1)
            .and_then(|prev| self.prefix_heights.get(prev).copied())
            .unwrap_or(0)
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn cache_with(heights: Vec<u16>, width: u16) -> LayoutCache {
        let mut cache = LayoutCache::new();
        cache.update_metadata(heights.len(), width);
        cache.heights = heights;
        cache.rebuild_prefix_heights();
        cache
    }

    #[test]
    fn test_layout_cache_reusable() {
        let cache = cache_with(vec![3; 4], 80);

        // Same count: everything but the trailing message
        assert_eq!(cache.reusable_count(4, 80), 3);
        // Appended messages: the old trailing one is re-measured too
        assert_eq!(cache.reusable_count(6, 80), 3);
        // Width changed
        assert_eq!(cache.reusable_count(4, 40), 0);
        // Log shrank
        assert_eq!(cache.reusable_count(3, 80), 0);
        // Fresh cache
        assert_eq!(LayoutCache::new().reusable_count(2, 80), 0);
    }

    #[test]
    fn test_prefix_heights_and_total() {
        let cache = cache_with(vec![3, 5, 2], 80);
        assert_eq!(cache.prefix_heights, vec![3, 8, 10]);
        assert_eq!(cache.total_height(), 10);
    }

    #[test]
    fn test_top_of_follows_prefix_heights() {
        let cache = cache_with(vec![3, 5, 2], 80);
        assert_eq!(cache.top_of(0), 0);
        assert_eq!(cache.top_of(1), 3);
        assert_eq!(cache.top_of(2), 8);
    }

    #[test]
    fn test_very_long_log_saturates_instead_of_overflowing() {
        let cache = cache_with(vec![1000; 70], 80);
        assert_eq!(cache.total_height(), u16::MAX);
        assert_eq!(cache.top_of(69), u16::MAX);

        // The message straddling the saturation point is still placed
        let range = cache.visible_range(u16::MAX - 20, 20);
        assert!(range.contains(&65));
        assert_eq!(cache.top_of(65), 65_000);
        assert!(range.end <= 70);
    }

    #[test]
    fn test_visible_range_covers_viewport() {
        let cache = cache_with(vec![10; 10], 80);
        // viewport [40, 50) with a 5-row buffer each side → items 3..=5
        let range = cache.visible_range(40, 10);
        assert!(range.contains(&4));
        assert!(range.start <= 3);
        assert!(range.end >= 5);
        assert!(range.end <= 10);
    }

    #[test]
    fn test_scroll_up_unpins_and_end_repins() {
        let mut state = MessageListState::new();
        assert!(state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_down_at_bottom_repins() {
        let mut state = MessageListState::new();
        state.stick_to_bottom = false;
        // Content fits the viewport: any offset is already the bottom
        state.layout = cache_with(vec![3, 3], 80);
        state.viewport_height = 20;

        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
        assert!(!state.has_unseen_content());
    }

    #[test]
    fn test_render_streaming_message_grows() {
        let palette = Palette::for_theme(Theme::Light);
        let mut state = MessageListState::new();
        let mut messages = vec![
            Message::user("hi".into()),
            Message::bot_placeholder(),
        ];
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

        terminal
            .draw(|f| MessageList::new(&mut state, &messages, &palette, false).render(f, f.area()))
            .unwrap();
        let before = state.layout.heights[1];

        messages[1].text = "a reply that is long enough to wrap over several lines".into();
        terminal
            .draw(|f| MessageList::new(&mut state, &messages, &palette, false).render(f, f.area()))
            .unwrap();

        assert!(state.layout.heights[1] > before);
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("hi"));
        assert!(text.contains("reply"));
    }
}
