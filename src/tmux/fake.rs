// In-memory tmux stand-in for tests. Records every invocation and simulates
// just enough server state (sessions, windows) for the query, kill and
// rename paths to behave like the real thing.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{describe, Runner};
use crate::error::TmuxError;

#[derive(Debug, Clone)]
struct FakeWindow {
    index: usize,
    name: String,
    active: bool,
}

#[derive(Debug, Clone)]
struct FakeSession {
    name: String,
    path: String,
    attached: bool,
    windows: Vec<FakeWindow>,
}

#[derive(Debug, Default)]
struct ServerState {
    sessions: Vec<FakeSession>,
    current: Option<String>,
}

#[derive(Default)]
pub struct FakeTmux {
    state: RefCell<ServerState>,
    calls: RefCell<Vec<Vec<String>>>,
    failures: RefCell<HashMap<String, String>>,
    outputs: RefCell<HashMap<String, String>>,
}

impl FakeTmux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live session with the given window names (indices 0..n, first active).
    pub fn with_session(self, name: &str, path: &str, windows: &[&str]) -> Self {
        let windows = windows.iter().enumerate()
            .map(|(i, w)| FakeWindow { index: i, name: w.to_string(), active: i == 0 })
            .collect();
        self.state.borrow_mut().sessions.push(FakeSession {
            name: name.to_string(),
            path: path.to_string(),
            attached: false,
            windows,
        });
        self
    }

    /// Mark `name` as the session the invoking client is attached to.
    pub fn with_current(self, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.current = Some(name.to_string());
            if let Some(s) = state.sessions.iter_mut().find(|s| s.name == name) {
                s.attached = true;
            }
        }
        self
    }

    /// Every later invocation of `verb` fails with `stderr`.
    pub fn fail_on(&self, verb: &str, stderr: &str) {
        self.failures.borrow_mut().insert(verb.to_string(), stderr.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures.borrow_mut().clear();
    }

    /// Replace the stdout of `verb` with canned text.
    pub fn set_output(&self, verb: &str, stdout: &str) {
        self.outputs.borrow_mut().insert(verb.to_string(), stdout.to_string());
    }

    /// Invocations as space-joined strings, e.g. "kill-session -t api".
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.join(" ")).collect()
    }

    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Invocations whose verb is `verb`.
    pub fn calls_to(&self, verb: &str) -> Vec<String> {
        self.calls.borrow().iter()
            .filter(|c| c.first().map(String::as_str) == Some(verb))
            .map(|c| c.join(" "))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn session_names(&self) -> Vec<String> {
        self.state.borrow().sessions.iter().map(|s| s.name.clone()).collect()
    }

    pub fn window_names(&self, session: &str) -> Vec<String> {
        self.state.borrow().sessions.iter()
            .find(|s| s.name == session)
            .map(|s| s.windows.iter().map(|w| w.name.clone()).collect())
            .unwrap_or_default()
    }

    fn simulate(&self, args: &[&str]) -> Result<String, String> {
        let verb = args.first().copied().unwrap_or("");
        let mut state = self.state.borrow_mut();
        match verb {
            "list-sessions" => {
                if state.sessions.is_empty() {
                    return Err("no server running on /tmp/tmux-1000/default".into());
                }
                Ok(state.sessions.iter()
                    .map(|s| format!("{}\t{}\t{}\t{}", s.name, s.windows.len(), s.attached as u8, s.path))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "list-windows" => {
                let name = flag_value(args, "-t").unwrap_or("");
                let session = find(&state.sessions, name)?;
                Ok(session.windows.iter()
                    .map(|w| format!("{}\t{}\t{}", w.index, w.name, w.active as u8))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "has-session" => {
                find(&state.sessions, flag_value(args, "-t").unwrap_or("")).map(|_| String::new())
            }
            "display-message" => state.current.clone().ok_or_else(|| "no current client".to_string()),
            "new-session" => {
                let name = flag_value(args, "-s").unwrap_or("");
                if state.sessions.iter().any(|s| s.name == name) {
                    return Err(format!("duplicate session: {}", name));
                }
                state.sessions.push(FakeSession {
                    name: name.to_string(),
                    path: flag_value(args, "-c").unwrap_or("").to_string(),
                    attached: false,
                    windows: vec![FakeWindow { index: 0, name: "shell".into(), active: true }],
                });
                Ok(String::new())
            }
            "new-window" => {
                let session = find_mut(&mut state.sessions, flag_value(args, "-t").unwrap_or(""))?;
                let index = session.windows.iter().map(|w| w.index + 1).max().unwrap_or(0);
                session.windows.iter_mut().for_each(|w| w.active = false);
                session.windows.push(FakeWindow {
                    index,
                    name: flag_value(args, "-n").unwrap_or("shell").to_string(),
                    active: true,
                });
                Ok(String::new())
            }
            "rename-window" => {
                let (session, index) = split_target(flag_value(args, "-t").unwrap_or(""))?;
                let new_name = args.last().copied().unwrap_or("");
                let session = find_mut(&mut state.sessions, session)?;
                let window = session.windows.iter_mut().find(|w| w.index == index)
                    .ok_or_else(|| format!("can't find window: {}", index))?;
                window.name = new_name.to_string();
                Ok(String::new())
            }
            "kill-session" => {
                let name = flag_value(args, "-t").unwrap_or("");
                find(&state.sessions, name)?;
                state.sessions.retain(|s| s.name != name);
                Ok(String::new())
            }
            "kill-window" => {
                let (name, index) = split_target(flag_value(args, "-t").unwrap_or(""))?;
                let session = find_mut(&mut state.sessions, name)?;
                let before = session.windows.len();
                session.windows.retain(|w| w.index != index);
                if session.windows.len() == before {
                    return Err(format!("can't find window: {}", index));
                }
                let emptied = session.windows.is_empty();
                let name = name.to_string();
                if emptied {
                    state.sessions.retain(|s| s.name != name);
                }
                Ok(String::new())
            }
            "rename-session" => {
                let old = flag_value(args, "-t").unwrap_or("");
                let new = args.last().copied().unwrap_or("");
                if state.sessions.iter().any(|s| s.name == new) {
                    return Err(format!("duplicate session: {}", new));
                }
                find_mut(&mut state.sessions, old)?.name = new.to_string();
                if state.current.as_deref() == Some(old) {
                    state.current = Some(new.to_string());
                }
                Ok(String::new())
            }
            "select-window" => {
                let (name, index) = split_target(flag_value(args, "-t").unwrap_or(""))?;
                let session = find_mut(&mut state.sessions, name)?;
                for w in session.windows.iter_mut() {
                    w.active = w.index == index;
                }
                Ok(String::new())
            }
            _ => Ok(String::new()),
        }
    }
}

impl Runner for FakeTmux {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        self.calls.borrow_mut().push(args.iter().map(|a| a.to_string()).collect());
        let verb = args.first().copied().unwrap_or("");

        if let Some(stderr) = self.failures.borrow().get(verb) {
            return Err(TmuxError::CommandFailed { command: describe(args), stderr: stderr.clone() });
        }
        if let Some(stdout) = self.outputs.borrow().get(verb) {
            return Ok(stdout.clone());
        }
        self.simulate(args)
            .map_err(|stderr| TmuxError::CommandFailed { command: describe(args), stderr })
    }
}

fn flag_value<'a>(args: &[&'a str], flag: &str) -> Option<&'a str> {
    args.iter().position(|a| *a == flag).and_then(|i| args.get(i + 1)).copied()
}

fn split_target(target: &str) -> Result<(&str, usize), String> {
    let (session, rest) = target.split_once(':').ok_or_else(|| format!("bad target: {}", target))?;
    let window = rest.split('.').next().unwrap_or("");
    let index = window.parse().map_err(|_| format!("bad window index: {}", window))?;
    Ok((session, index))
}

// Like tmux: "=name" is exact, otherwise an exact name wins over a
// unique prefix.
fn find<'a>(sessions: &'a [FakeSession], target: &str) -> Result<&'a FakeSession, String> {
    let missing = || format!("can't find session: {}", target);
    if let Some(exact) = target.strip_prefix('=') {
        return sessions.iter().find(|s| s.name == exact).ok_or_else(missing);
    }
    if let Some(s) = sessions.iter().find(|s| s.name == target) {
        return Ok(s);
    }
    let mut prefixed = sessions.iter().filter(|s| s.name.starts_with(target));
    match (prefixed.next(), prefixed.next()) {
        (Some(s), None) => Ok(s),
        _ => Err(missing()),
    }
}

fn find_mut<'a>(sessions: &'a mut [FakeSession], name: &str) -> Result<&'a mut FakeSession, String> {
    sessions.iter_mut().find(|s| s.name == name).ok_or_else(|| format!("can't find session: {}", name))
}
