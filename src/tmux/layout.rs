// Reproduce a declarative layout inside a freshly created session.
// Every structural step is fail-fast; nothing is rolled back.

use std::path::Path;

use tracing::{debug, warn};

use super::{session, Runner};
use crate::config::{Layout, OnStart};
use crate::error::LayoutError;

/// Build `layout` in `session_name`, which must be brand new (exactly one
/// window, index 0). Selecting pane 0 / window 0 at the end is best-effort.
pub fn apply_layout(
    tmux: &dyn Runner,
    session_name: &str,
    layout: &Layout,
    work_dir: &Path,
) -> Result<(), LayoutError> {
    for (i, win) in layout.windows.iter().enumerate() {
        let target = session::window_target(session_name, i);

        if i == 0 {
            session::rename_window(tmux, &target, &win.name)
                .map_err(|source| LayoutError::RenameWindow { window: win.name.clone(), source })?;
        } else {
            session::new_window(tmux, session_name, &win.name)
                .map_err(|source| LayoutError::CreateWindow { window: win.name.clone(), source })?;
            let cd = format!("cd {}", shell_escape(&work_dir.to_string_lossy()));
            session::send_keys(tmux, &target, &cd)
                .map_err(|source| LayoutError::SetDirectory { window: win.name.clone(), source })?;
        }

        if let Some(cmd) = win.panes.first().and_then(|p| p.command.as_deref()) {
            session::send_keys(tmux, &session::pane_target(session_name, i, 0), cmd)
                .map_err(|source| LayoutError::PaneCommand { window: win.name.clone(), pane: 0, source })?;
        }

        for (j, pane) in win.panes.iter().enumerate().skip(1) {
            session::split_window(tmux, &target, pane.split, pane.size, work_dir)
                .map_err(|source| LayoutError::Split { window: win.name.clone(), pane: j, source })?;

            if let Some(cmd) = pane.command.as_deref() {
                session::send_keys(tmux, &session::pane_target(session_name, i, j), cmd)
                    .map_err(|source| LayoutError::PaneCommand { window: win.name.clone(), pane: j, source })?;
            }
        }

        if let Err(e) = session::select_first_pane(tmux, &target) {
            warn!(window = %win.name, error = %e, "select-pane failed; ignoring");
        }
    }

    if let Err(e) = session::select_window(tmux, &session::window_target(session_name, 0)) {
        warn!(session = session_name, error = %e, "select-window failed; ignoring");
    }
    Ok(())
}

/// Type each on-start command into pane 0 of its window. Entries naming a
/// window the layout doesn't have are skipped. Must run after `apply_layout`.
pub fn run_on_start(
    tmux: &dyn Runner,
    session_name: &str,
    layout: &Layout,
    commands: &[OnStart],
) -> Result<(), LayoutError> {
    for cmd in commands {
        let Some(i) = layout.window_index(&cmd.window) else {
            debug!(window = %cmd.window, "on_start window not in layout; skipping");
            continue;
        };
        session::send_keys(tmux, &session::pane_target(session_name, i, 0), &cmd.command)
            .map_err(|source| LayoutError::OnStart { window: cmd.window.clone(), source })?;
    }
    Ok(())
}

/// Single-quote for a POSIX shell.
pub fn shell_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
