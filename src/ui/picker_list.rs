// Main list: "Projects" and "Active Sessions" sections over the flattened rows.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};
use crate::model::picker::PickerItem;

const HEADER_PROJECTS: &str = "Projects";
const HEADER_SESSIONS: &str = "Active Sessions";
const NO_PROJECTS: &str = "(no projects configured)";
const NO_SESSIONS: &str = "(no active sessions)";

/// One visual line. Headers and placeholders are never selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLine {
    Header(&'static str),
    Placeholder(&'static str),
    Blank,
    /// Index into the picker rows.
    Item(usize),
}

/// Section layout for `items`, which are projects first, then sessions
/// with their windows.
pub fn section_lines(items: &[PickerItem]) -> Vec<ListLine> {
    let split = items.iter()
        .position(|i| !matches!(i, PickerItem::Project { .. }))
        .unwrap_or(items.len());

    let mut lines = vec![ListLine::Header(HEADER_PROJECTS)];
    if split == 0 {
        lines.push(ListLine::Placeholder(NO_PROJECTS));
    }
    lines.extend((0..split).map(ListLine::Item));

    lines.push(ListLine::Blank);
    lines.push(ListLine::Header(HEADER_SESSIONS));
    if split == items.len() {
        lines.push(ListLine::Placeholder(NO_SESSIONS));
    }
    lines.extend((split..items.len()).map(ListLine::Item));
    lines
}

/// Draw the list and return the scroll offset that keeps the cursor visible.
pub fn render_picker(
    frame: &mut Frame,
    area: Rect,
    items: &[PickerItem],
    cursor: usize,
    scroll_offset: usize,
) -> usize {
    let lines = section_lines(items);
    let selected_line = lines.iter().position(|l| *l == ListLine::Item(cursor));

    let visible = area.height.saturating_sub(2) as usize;
    let mut offset = scroll_offset.min(lines.len().saturating_sub(1));
    if let Some(line) = selected_line {
        offset = compute_scroll(line, visible, offset);
        // keep the section header in view when the cursor is at the top
        if line > 0 && line <= offset + 1 && matches!(lines[line - 1], ListLine::Header(_)) {
            offset = line - 1;
        }
    }

    let list_items: Vec<ListItem> = lines.iter().map(|line| match line {
        ListLine::Header(text) => ListItem::new(*text).style(Style::default().fg(Color::Magenta).bold()),
        ListLine::Placeholder(text) => ListItem::new(format!("  {}", text)).style(Style::default().fg(Color::DarkGray)),
        ListLine::Blank => ListItem::new(""),
        ListLine::Item(i) => item_row(&items[*i]),
    }).collect();

    let mut list_state = ListState::default().with_offset(offset);
    list_state.select(selected_line);

    let list = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tplm ")
                .title_style(Style::default().bold()),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Magenta).bold())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut list_state);
    list_state.offset()
}

fn item_row(item: &PickerItem) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let line = match item {
        PickerItem::Project { name, path } => Line::from(vec![
            Span::styled(format!("  {}", name), Style::default().fg(Color::White).bold()),
            Span::styled(format!("  {}", path.display()), dim),
        ]),
        PickerItem::Session { name, windows, attached, expanded } => {
            let dot = if *attached {
                Span::styled("  ●", Style::default().fg(Color::Green))
            } else {
                Span::styled("  ○", dim)
            };
            let chevron = if *expanded { "▼" } else { "▶" };
            let mut spans = vec![
                dot,
                Span::raw(format!(" {} ", chevron)),
                Span::styled(name.clone(), Style::default().fg(Color::Cyan)),
            ];
            if !expanded {
                let noun = if *windows == 1 { "window" } else { "windows" };
                spans.push(Span::styled(format!("  {} {}", windows, noun), dim));
            }
            Line::from(spans)
        }
        PickerItem::Window { index, name, active, .. } => {
            let marker = if *active {
                Span::styled("* ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            };
            Line::from(vec![
                Span::raw("       "),
                marker,
                Span::styled(format!("{}: ", index), dim),
                Span::raw(name.clone()),
            ])
        }
    };
    ListItem::new(line)
}

/// Compute scroll offset to keep selected item visible.
pub fn compute_scroll(selected: usize, visible_height: usize, current_offset: usize) -> usize {
    if visible_height == 0 {
        selected
    } else if selected < current_offset {
        selected
    } else if selected >= current_offset + visible_height {
        selected.saturating_sub(visible_height - 1)
    } else {
        current_offset
    }
}
