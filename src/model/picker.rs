use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::Project;
use crate::tmux::query::{SessionInfo, WindowInfo};
use crate::tmux::session::window_target;

/// Expanded session name -> its windows as last queried.
pub type ExpansionMap = HashMap<String, Vec<WindowInfo>>;

/// One row of the picker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerItem {
    Project {
        name: String,
        path: PathBuf,
    },
    Session {
        name: String,
        windows: usize,
        attached: bool,
        expanded: bool,
    },
    Window {
        session: String,
        index: usize,
        name: String,
        active: bool,
    },
}

impl PickerItem {
    pub fn name(&self) -> &str {
        match self {
            PickerItem::Project { name, .. }
            | PickerItem::Session { name, .. }
            | PickerItem::Window { name, .. } => name,
        }
    }

    pub fn is_session(&self) -> bool {
        matches!(self, PickerItem::Session { .. })
    }

    /// What a switch-request for this row targets. Projects have none until
    /// their session exists.
    pub fn switch_target(&self) -> Option<String> {
        match self {
            PickerItem::Project { .. } => None,
            PickerItem::Session { name, .. } => Some(name.clone()),
            PickerItem::Window { session, index, .. } => Some(window_target(session, *index)),
        }
    }
}

/// Projects, then sessions, each expanded session followed directly by its
/// windows in the order tmux listed them.
pub fn flatten(projects: &[Project], sessions: &[SessionInfo], expanded: &ExpansionMap) -> Vec<PickerItem> {
    let mut items = Vec::with_capacity(projects.len() + sessions.len());

    for p in projects {
        items.push(PickerItem::Project { name: p.name.clone(), path: p.path.clone() });
    }

    for s in sessions {
        let windows = expanded.get(&s.name);
        items.push(PickerItem::Session {
            name: s.name.clone(),
            windows: s.windows,
            attached: s.attached,
            expanded: windows.is_some(),
        });
        for w in windows.into_iter().flatten() {
            items.push(PickerItem::Window {
                session: s.name.clone(),
                index: w.index,
                name: w.name.clone(),
                active: w.active,
            });
        }
    }
    items
}

/// Nearest session row at or before `from`.
pub fn parent_session_index(items: &[PickerItem], from: usize) -> Option<usize> {
    items.get(..=from)?.iter().rposition(PickerItem::is_session)
}
