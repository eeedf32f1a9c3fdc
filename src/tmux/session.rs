// tmux session/window/pane commands
// ref: tmux(1)

use std::path::Path;
use std::process::Stdio;

use anyhow::{bail, Context, Result};

use super::{tmux_cmd, Runner};
use crate::config::SplitDirection;
use crate::error::TmuxError;

/// Check if tmux is available.
pub fn is_available() -> bool {
    tmux_cmd(&["-V"]).stdout(Stdio::null()).stderr(Stdio::null())
        .status().map(|s| s.success()).unwrap_or(false)
}

/// Returns true when running inside a tmux session.
pub fn is_inside_tmux() -> bool {
    std::env::var("TMUX").is_ok()
}

/// "session:index"
pub fn window_target(session: &str, index: usize) -> String {
    format!("{}:{}", session, index)
}

/// "session:index.pane"
pub fn pane_target(session: &str, index: usize, pane: usize) -> String {
    format!("{}:{}.{}", session, index, pane)
}

/// Create a new detached session with a starting directory.
pub fn new_session(tmux: &dyn Runner, name: &str, start_dir: &Path) -> Result<(), TmuxError> {
    tmux.run_silent(&["new-session", "-d", "-s", name, "-c", &start_dir.to_string_lossy()])
}

pub fn kill_session(tmux: &dyn Runner, name: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["kill-session", "-t", name])
}

pub fn rename_session(tmux: &dyn Runner, old_name: &str, new_name: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["rename-session", "-t", old_name, new_name])
}

/// switch-client (inside tmux path). `target` is a session or "session:window".
pub fn switch_client(tmux: &dyn Runner, target: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["switch-client", "-t", target])
}

/// New window appended to `session`.
pub fn new_window(tmux: &dyn Runner, session: &str, name: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["new-window", "-t", session, "-n", name])
}

/// Kill one window. `target` is "session:index".
pub fn kill_window(tmux: &dyn Runner, target: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["kill-window", "-t", target])
}

pub fn rename_window(tmux: &dyn Runner, target: &str, name: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["rename-window", "-t", target, name])
}

/// Type `keys` into the target pane followed by Enter.
pub fn send_keys(tmux: &dyn Runner, target: &str, keys: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["send-keys", "-t", target, keys, "Enter"])
}

pub fn select_window(tmux: &dyn Runner, target: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["select-window", "-t", target])
}

/// Select pane 0 of the window `window_target`.
pub fn select_first_pane(tmux: &dyn Runner, window_target: &str) -> Result<(), TmuxError> {
    tmux.run_silent(&["select-pane", "-t", &format!("{}.0", window_target)])
}

/// Split the active pane of `target`. Horizontal puts the new pane beside the
/// old one, vertical stacks it below.
pub fn split_window(
    tmux: &dyn Runner,
    target: &str,
    direction: SplitDirection,
    size_percent: Option<u8>,
    start_dir: &Path,
) -> Result<(), TmuxError> {
    let flag = match direction {
        SplitDirection::Horizontal => "-h",
        SplitDirection::Vertical => "-v",
    };
    let size = size_percent.map(|p| p.to_string());
    let dir = start_dir.to_string_lossy();

    let mut args = vec!["split-window", "-t", target, flag];
    if let Some(size) = size.as_deref() {
        args.extend(["-p", size]);
    }
    args.extend(["-c", &*dir]);
    tmux.run_silent(&args)
}

/// attach-session from outside tmux. Takes over the terminal until detach.
pub fn attach_foreground(target: &str) -> Result<()> {
    let status = tmux_cmd(&["attach-session", "-t", target])
        .status()
        .with_context(|| format!("attaching to {}", target))?;
    if !status.success() { bail!("tmux attach-session failed for {}", target); }
    Ok(())
}
