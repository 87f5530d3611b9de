//! Cursor position and horizontal scroll for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the scroll column. The text
//! is owned by `InputBox` and passed in explicitly.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Display columns hidden to the left of the viewport
    pub scroll: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self { pos: 0, scroll: 0 }
    }

    /// Reset cursor to start (used after Submit clears the buffer).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll = 0;
    }

    pub fn move_left(&mut self, buffer: &str) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos = prev_char_boundary(buffer, self.pos);
        true
    }

    pub fn move_right(&mut self, buffer: &str) -> bool {
        if self.pos >= buffer.len() {
            return false;
        }
        self.pos = next_char_boundary(buffer, self.pos);
        true
    }

    pub fn move_home(&mut self) -> bool {
        (self.pos != 0).then(|| self.pos = 0).is_some()
    }

    pub fn move_end(&mut self, buffer: &str) -> bool {
        (self.pos != buffer.len()).then(|| self.pos = buffer.len()).is_some()
    }

    /// Display column of the cursor within the whole buffer.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Scroll so the cursor column lies inside a viewport `width` columns wide.
    pub fn update_scroll(&mut self, buffer: &str, width: usize) {
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let column = self.column(buffer);
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + width {
            // Leave the last cell free for the cursor itself
            self.scroll = column + 1 - width;
        }
    }

    /// The slice of `buffer` visible in a viewport `width` columns wide.
    pub fn visible<'b>(&self, buffer: &'b str, width: usize) -> &'b str {
        let mut start = buffer.len();
        let mut end = buffer.len();
        let mut col = 0usize;
        for (idx, ch) in buffer.char_indices() {
            if col >= self.scroll && start == buffer.len() {
                start = idx;
            }
            let ch_width = ch.width().unwrap_or(0);
            if col + ch_width > self.scroll + width {
                end = idx;
                break;
            }
            col += ch_width;
        }
        if start > end {
            return "";
        }
        &buffer[start..end]
    }
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
