// Kill confirmation popup.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use crate::model::picker::PickerItem;
use crate::ui::popup_upper;

/// "Kill session "api"?" for the row about to be killed.
pub fn kill_prompt(item: &PickerItem) -> Option<String> {
    match item {
        PickerItem::Session { name, windows, .. } => Some(format!(
            "Kill session {:?} and its {} window{}?",
            name,
            windows,
            if *windows == 1 { "" } else { "s" }
        )),
        PickerItem::Window { session, index, name, .. } => {
            Some(format!("Kill window {:?} ({}:{})?", name, session, index))
        }
        PickerItem::Project { .. } => None,
    }
}

pub fn render_confirm(frame: &mut Frame, area: Rect, message: &str) {
    let width = 56_u16.min(area.width);
    let popup = popup_upper(area, width, 5);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Kill ")
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let msg_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
    frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), msg_area);

    let line = Line::from(vec![
        Span::styled("[y/Enter]", Style::default().fg(Color::Green).bold()),
        Span::raw(" Kill  "),
        Span::styled("[n/Esc]", Style::default().fg(Color::Red).bold()),
        Span::raw(" Cancel"),
    ]);
    let bar = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1);
    frame.render_widget(Paragraph::new(line), bar);
}
