// In-place session rename: a one-line editor seeded with the current name.

use crate::action::Action;
use crate::app::Msg;
use crate::ui::input::InputState;

pub const RENAME_MAX_LEN: usize = 64;
const PROMPT: &str = "Rename: ";

pub struct RenameModel {
    pub input: InputState,
    old_name: String,
}

impl RenameModel {
    pub fn new(current: &str) -> Self {
        Self {
            input: InputState::with_value(PROMPT, current, RENAME_MAX_LEN),
            old_name: current.to_string(),
        }
    }

    pub fn old_name(&self) -> &str {
        &self.old_name
    }

    /// Enter and Esc end the edit with a message; everything else edits.
    pub fn handle(&mut self, action: Action) -> Option<Msg> {
        match action {
            Action::InputSubmit => {
                let new_name = self.input.value();
                if new_name.is_empty() || new_name == self.old_name {
                    Some(Msg::RenameCancelled)
                } else {
                    Some(Msg::RenameConfirmed {
                        old: self.old_name.clone(),
                        new: new_name.to_string(),
                    })
                }
            }
            Action::InputEscape => Some(Msg::RenameCancelled),
            Action::InputChar(c) => { self.input.insert_char(c); None }
            Action::InputBackspace => { self.input.backspace(); None }
            Action::InputDelete => { self.input.delete(); None }
            Action::InputLeft => { self.input.cursor_left(); None }
            Action::InputRight => { self.input.cursor_right(); None }
            Action::InputHome => { self.input.cursor_home(); None }
            Action::InputEnd => { self.input.cursor_end(); None }
            _ => None,
        }
    }
}
