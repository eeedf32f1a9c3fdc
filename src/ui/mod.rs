// Layout orchestration

pub mod confirm;
pub mod input;
pub mod picker_list;

use crate::app::{App, Mode};
use crate::tmux::Runner;
use crate::ui::{
    confirm::{kill_prompt, render_confirm},
    input::render_input,
    picker_list::render_picker,
};
use ratatui::{prelude::*, widgets::Paragraph};

/// Place a popup in the upper third of `area`.
pub fn popup_upper(area: Rect, w: u16, h: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + area.height / 3;
    Rect::new(x, y, w.min(area.width), h.min(area.height))
}

pub fn render<R: Runner>(frame: &mut Frame, app: &mut App<R>) {
    let area = frame.area();
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    app.scroll = render_picker(frame, main_area, &app.items, app.cursor, app.scroll);
    render_status_bar(frame, status_area, app);
    render_overlay(frame, main_area, app);
}

fn render_overlay<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    match &app.mode {
        Mode::ConfirmKill => {
            if let Some(msg) = app.selected().and_then(kill_prompt) {
                render_confirm(frame, area, &msg);
            }
        }
        Mode::Rename(model) => {
            let title = format!("Rename session {}", model.old_name());
            render_input(frame, area, &model.input, &title);
        }
        Mode::Normal => {}
    }
}

fn mode_label<R: Runner>(app: &App<R>) -> &'static str {
    match app.mode {
        Mode::Normal => "NORMAL",
        Mode::ConfirmKill => "CONFIRM",
        Mode::Rename(_) => "RENAME",
    }
}

fn hints<R: Runner>(app: &App<R>) -> &'static str {
    match app.mode {
        Mode::Normal => "hjkl navigate  ⏎ select  d kill  r rename  R refresh  q quit",
        Mode::ConfirmKill => "(y)es  (n)o",
        Mode::Rename(_) => "⏎ confirm  Esc cancel",
    }
}

fn render_status_bar<R: Runner>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let mode_text = format!(" [{}] ", mode_label(app));
    let badge_style = Style::default().fg(Color::Black).bg(Color::Yellow).bold();

    let ver = concat!(" v", env!("CARGO_PKG_VERSION"), " ");
    let ver_style = Style::default().fg(Color::DarkGray);

    let (left, left_style) = match &app.error {
        Some(err) => (format!(" Error: {}", err), Style::default().fg(Color::Red)),
        None => (format!(" {}", hints(app)), Style::default().fg(Color::Gray)),
    };

    let used = mode_text.chars().count() + left.chars().count() + ver.len();
    let pad = (area.width as usize).saturating_sub(used);
    let spans = vec![
        Span::styled(mode_text, badge_style),
        Span::styled(left, left_style),
        Span::raw(" ".repeat(pad)),
        Span::styled(ver, ver_style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
