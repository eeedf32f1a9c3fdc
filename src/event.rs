use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use anyhow::Result;
use crate::action::Action;

/// Which key table applies. Mirrors `app::Mode` without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Normal,
    Confirm,
    Input,
}

/// `Ok(None)` on timeout, which the caller treats as a tick.
pub fn poll_event(timeout: Duration, ctx: KeyContext) -> Result<Option<Action>> {
    if event::poll(timeout)? {
        let action = match event::read()? {
            // Windows reports both press and release.
            Event::Key(key) if key.kind != KeyEventKind::Release => translate(key, ctx),
            _ => Action::None,
        };
        Ok(Some(action))
    } else {
        Ok(None)
    }
}

pub fn translate(key: KeyEvent, ctx: KeyContext) -> Action {
    match ctx {
        KeyContext::Normal => translate_key(key),
        KeyContext::Confirm => translate_confirm_key(key),
        KeyContext::Input => translate_input_key(key),
    }
}

/// Normal mode: chars are commands.
fn translate_key(key: KeyEvent) -> Action {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Action::Quit,
        (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::NONE, KeyCode::Esc) => Action::Quit,
        (KeyModifiers::NONE, KeyCode::Char('j')) | (KeyModifiers::NONE, KeyCode::Down) => Action::NavigateDown,
        (KeyModifiers::NONE, KeyCode::Char('k')) | (KeyModifiers::NONE, KeyCode::Up) => Action::NavigateUp,
        (KeyModifiers::NONE, KeyCode::Char('h')) | (KeyModifiers::NONE, KeyCode::Left) => Action::NavigateLeft,
        (KeyModifiers::NONE, KeyCode::Char('l')) | (KeyModifiers::NONE, KeyCode::Right) => Action::NavigateRight,
        (KeyModifiers::NONE, KeyCode::Enter) => Action::Select,
        (KeyModifiers::NONE, KeyCode::Char('d')) => Action::Kill,
        (KeyModifiers::NONE, KeyCode::Char('r')) => Action::Rename,
        (KeyModifiers::SHIFT, KeyCode::Char('R')) | (KeyModifiers::NONE, KeyCode::Char('R')) => Action::Refresh,
        _ => Action::None,
    }
}

fn translate_confirm_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::ConfirmYes,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::ConfirmNo,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::ConfirmNo,
        _ => Action::None,
    }
}

/// Input mode: only special keys are translated; all chars go to the buffer.
fn translate_input_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('a') => Action::InputHome,
            KeyCode::Char('e') => Action::InputEnd,
            KeyCode::Char('c') => Action::InputEscape,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Enter => Action::InputSubmit,
        KeyCode::Esc => Action::InputEscape,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Delete => Action::InputDelete,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn normal_keys() {
        let ctx = KeyContext::Normal;
        assert_eq!(translate(key(KeyCode::Char('j')), ctx), Action::NavigateDown);
        assert_eq!(translate(key(KeyCode::Up), ctx), Action::NavigateUp);
        assert_eq!(translate(key(KeyCode::Char('l')), ctx), Action::NavigateRight);
        assert_eq!(translate(key(KeyCode::Enter), ctx), Action::Select);
        assert_eq!(translate(key(KeyCode::Char('d')), ctx), Action::Kill);
        assert_eq!(translate(key(KeyCode::Char('r')), ctx), Action::Rename);
        assert_eq!(translate(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT), ctx), Action::Refresh);
        assert_eq!(translate(key(KeyCode::Esc), ctx), Action::Quit);
        assert_eq!(translate(ctrl('c'), ctx), Action::Quit);
        assert_eq!(translate(key(KeyCode::Char('x')), ctx), Action::None);
    }

    #[test]
    fn confirm_keys() {
        let ctx = KeyContext::Confirm;
        assert_eq!(translate(key(KeyCode::Char('y')), ctx), Action::ConfirmYes);
        assert_eq!(translate(key(KeyCode::Enter), ctx), Action::ConfirmYes);
        assert_eq!(translate(key(KeyCode::Char('n')), ctx), Action::ConfirmNo);
        assert_eq!(translate(key(KeyCode::Esc), ctx), Action::ConfirmNo);
        assert_eq!(translate(key(KeyCode::Char('q')), ctx), Action::None);
    }

    #[test]
    fn input_keys_pass_chars_through() {
        let ctx = KeyContext::Input;
        assert_eq!(translate(key(KeyCode::Char('q')), ctx), Action::InputChar('q'));
        assert_eq!(translate(key(KeyCode::Char('d')), ctx), Action::InputChar('d'));
        assert_eq!(
            translate(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT), ctx),
            Action::InputChar('A')
        );
        assert_eq!(translate(key(KeyCode::Enter), ctx), Action::InputSubmit);
        assert_eq!(translate(key(KeyCode::Esc), ctx), Action::InputEscape);
        assert_eq!(translate(ctrl('a'), ctx), Action::InputHome);
        assert_eq!(translate(ctrl('e'), ctx), Action::InputEnd);
        assert_eq!(translate(key(KeyCode::Delete), ctx), Action::InputDelete);
    }
}
