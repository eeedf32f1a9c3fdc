// Read-side tmux queries: sessions, windows, current client.
// Output is requested tab-delimited so names with spaces or colons survive.

use super::Runner;
use crate::error::TmuxError;

const SESSION_FORMAT: &str = "#{session_name}\t#{session_windows}\t#{session_attached}\t#{session_path}";
const WINDOW_FORMAT: &str = "#{window_index}\t#{window_name}\t#{window_active}";
const SESSION_NAME_FORMAT: &str = "#{session_name}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub name: String,
    pub windows: usize,
    pub attached: bool,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// tmux-assigned; gaps appear after kills.
    pub index: usize,
    pub name: String,
    pub active: bool,
}

/// All live sessions. A missing server is an empty list, not an error.
pub fn list_sessions(tmux: &dyn Runner) -> Result<Vec<SessionInfo>, TmuxError> {
    match tmux.run(&["list-sessions", "-F", SESSION_FORMAT]) {
        Ok(out) => parse_sessions(&out),
        Err(e) if e.is_no_server() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

pub fn parse_sessions(out: &str) -> Result<Vec<SessionInfo>, TmuxError> {
    let mut sessions = Vec::new();
    for line in out.lines() {
        let parts: Vec<&str> = line.splitn(4, '\t').collect();
        let [name, windows, attached, path] = parts[..] else { continue };
        let windows = windows.parse().map_err(|_| TmuxError::InvalidField {
            record: name.to_string(),
            field: "window count",
            value: windows.to_string(),
        })?;
        sessions.push(SessionInfo {
            name: name.to_string(),
            windows,
            attached: flag(attached),
            path: path.to_string(),
        });
    }
    Ok(sessions)
}

/// Windows of one session, in tmux index order.
pub fn list_windows(tmux: &dyn Runner, session: &str) -> Result<Vec<WindowInfo>, TmuxError> {
    let out = tmux.run(&["list-windows", "-t", session, "-F", WINDOW_FORMAT])?;
    parse_windows(session, &out)
}

pub fn parse_windows(session: &str, out: &str) -> Result<Vec<WindowInfo>, TmuxError> {
    let mut windows = Vec::new();
    for line in out.lines() {
        let parts: Vec<&str> = line.splitn(3, '\t').collect();
        let [index, name, active] = parts[..] else { continue };
        let index = index.parse().map_err(|_| TmuxError::InvalidField {
            record: session.to_string(),
            field: "window index",
            value: index.to_string(),
        })?;
        windows.push(WindowInfo { index, name: name.to_string(), active: flag(active) });
    }
    Ok(windows)
}

/// Exact-name probe. A bare `-t api` would also match "api-v2".
/// Any failure, including "no server", counts as absent.
pub fn session_exists(tmux: &dyn Runner, name: &str) -> bool {
    let target = format!("={}", name);
    tmux.run_silent(&["has-session", "-t", &target]).is_ok()
}

/// Session the invoking client is attached to.
pub fn current_session(tmux: &dyn Runner) -> Result<String, TmuxError> {
    tmux.run(&["display-message", "-p", SESSION_NAME_FORMAT])
        .map(|s| s.trim().to_string())
}

/// Session to move to before `current` goes away: the next one in list order,
/// or the previous one if `current` is last.
pub fn neighbor_session(tmux: &dyn Runner, current: &str) -> Option<String> {
    let sessions = list_sessions(tmux).ok()?;
    neighbor_in(&sessions, current)
}

fn neighbor_in(sessions: &[SessionInfo], current: &str) -> Option<String> {
    if sessions.len() < 2 {
        return None;
    }
    let pos = sessions.iter().position(|s| s.name == current)?;
    let neighbor = sessions.get(pos + 1).unwrap_or_else(|| &sessions[pos - 1]);
    Some(neighbor.name.clone())
}

// tmux flags are counts ("2" attached clients) or 0/1.
fn flag(s: &str) -> bool {
    s.trim().parse::<u32>().map(|n| n > 0).unwrap_or(false)
}
