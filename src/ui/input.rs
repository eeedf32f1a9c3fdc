// Single-line input box with cursor movement and unicode support.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use crate::ui::popup_upper;

pub struct InputState {
    pub buffer: String,
    pub cursor: usize, // byte offset
    pub prompt: String,
    /// Limit in chars, not bytes.
    max_len: usize,
}

impl InputState {
    /// `max_len` bounds typing only; a longer seed is kept whole.
    pub fn with_value(prompt: impl Into<String>, value: impl Into<String>, max_len: usize) -> Self {
        let buffer: String = value.into();
        Self { cursor: buffer.len(), buffer, prompt: prompt.into(), max_len }
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() || self.buffer.chars().count() >= self.max_len {
            return;
        }
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.buffer.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.buffer.drain(self.cursor..self.cursor + c.len_utf8());
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn cursor_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn display_cursor(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }
}

pub fn render_input(frame: &mut Frame, area: Rect, state: &InputState, title: &str) {
    let width = area.width.min(60);
    let popup = popup_upper(area, width, 3);

    frame.render_widget(Clear, popup);

    let display = format!("{}{}", state.prompt, state.buffer);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Cyan));
    let para = Paragraph::new(display).block(block);
    frame.render_widget(para, popup);

    let cursor_col = state.prompt.chars().count() + state.display_cursor();
    let cursor_x = popup.x + 1 + cursor_col as u16;
    frame.set_cursor_position((cursor_x.min(popup.x + popup.width.saturating_sub(2)), popup.y + 1));
}
