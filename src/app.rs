// Picker state machine and event loop.
// ref: ratatui app patterns — https://ratatui.rs/concepts/application-patterns/

use std::collections::HashSet;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    action::Action,
    config::Config,
    error::TmuxError,
    event::{poll_event, KeyContext},
    model::{
        picker::{flatten, parent_session_index, ExpansionMap, PickerItem},
        rename::RenameModel,
    },
    ops,
    tmux::{query::{self, SessionInfo}, session, Runner},
    tui::Tui,
    ui,
};

const TICK_MS: u64 = 250;
const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

// ── Modes / messages ─────────────────────────────────────────────────────────

pub enum Mode {
    Normal,
    /// Target is whatever row the cursor is on.
    ConfirmKill,
    Rename(RenameModel),
}

/// Everything `update` reacts to. Keys and ticks come from the terminal;
/// the rest are produced by `update` itself and fed straight back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Key(Action),
    Tick,
    /// Session name or "session:index".
    SwitchTo(String),
    RenameConfirmed { old: String, new: String },
    RenameCancelled,
}

// ── App ──────────────────────────────────────────────────────────────────────

pub struct App<R: Runner> {
    pub config: Config,
    tmux: R,
    pub sessions: Vec<SessionInfo>,
    pub expanded: ExpansionMap,
    pub items: Vec<PickerItem>,
    pub cursor: usize,
    pub scroll: usize,
    pub mode: Mode,
    pub error: Option<String>,
    pub should_quit: bool,
    inside_tmux: bool,
    /// Set when a switch was requested outside tmux; main attaches after
    /// the terminal is restored.
    pub attach_target: Option<String>,
    /// A failed switch-client, reported once the picker has exited.
    pub switch_error: Option<anyhow::Error>,
    last_refresh: Instant,
}

impl<R: Runner> App<R> {
    pub fn new(config: Config, tmux: R, inside_tmux: bool) -> Self {
        let mut app = Self {
            config,
            tmux,
            sessions: Vec::new(),
            expanded: ExpansionMap::new(),
            items: Vec::new(),
            cursor: 0,
            scroll: 0,
            mode: Mode::Normal,
            error: None,
            should_quit: false,
            inside_tmux,
            attach_target: None,
            switch_error: None,
            last_refresh: Instant::now(),
        };
        app.refresh();
        app.expand_current();
        app
    }

    /// Put the cursor on the client's own session and open it up.
    fn expand_current(&mut self) {
        if !self.inside_tmux {
            return;
        }
        let current = match query::current_session(&self.tmux) {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => return,
            Err(e) => {
                debug!(error = %e, "no current session");
                return;
            }
        };
        let Some(pos) = self.items.iter().position(|i| i.is_session() && i.name() == current) else {
            return;
        };
        self.cursor = pos;
        if let Err(e) = self.expand(&current) {
            self.error = Some(e.to_string());
        }
    }

    pub fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            let msg = match poll_event(Duration::from_millis(TICK_MS), self.key_context())? {
                Some(action) => Msg::Key(action),
                None => Msg::Tick,
            };
            self.send(msg);
        }
        Ok(())
    }

    pub fn key_context(&self) -> KeyContext {
        match self.mode {
            Mode::Normal => KeyContext::Normal,
            Mode::ConfirmKill => KeyContext::Confirm,
            Mode::Rename(_) => KeyContext::Input,
        }
    }

    /// Feed `msg` and every message it produces through `update`.
    pub fn send(&mut self, msg: Msg) {
        let mut next = Some(msg);
        while let Some(msg) = next {
            next = self.update(msg);
        }
    }

    pub fn update(&mut self, msg: Msg) -> Option<Msg> {
        match msg {
            Msg::Tick => {
                if matches!(self.mode, Mode::Normal) && self.last_refresh.elapsed() >= REFRESH_INTERVAL {
                    self.refresh();
                }
                None
            }
            Msg::SwitchTo(target) => {
                self.switch_to(target);
                None
            }
            Msg::RenameConfirmed { old, new } => {
                self.finish_rename(&old, &new);
                None
            }
            Msg::RenameCancelled => {
                self.mode = Mode::Normal;
                None
            }
            Msg::Key(action) => {
                if let Mode::Rename(model) = &mut self.mode {
                    return model.handle(action);
                }
                if matches!(self.mode, Mode::ConfirmKill) {
                    self.update_confirm(action);
                    return None;
                }
                self.update_normal(action)
            }
        }
    }

    pub fn selected(&self) -> Option<&PickerItem> {
        self.items.get(self.cursor)
    }

    // ── Refresh ───────────────────────────────────────────────────────────────

    /// Re-query live sessions, prune expansion entries for sessions that are
    /// gone, re-query windows of the ones still expanded, rebuild the rows.
    pub fn refresh(&mut self) {
        match query::list_sessions(&self.tmux) {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => {
                warn!(error = %e, "list-sessions failed; keeping previous list");
                self.error = Some(e.to_string());
            }
        }

        let live: HashSet<&str> = self.sessions.iter().map(|s| s.name.as_str()).collect();
        self.expanded.retain(|name, _| live.contains(name.as_str()));

        for (name, windows) in self.expanded.iter_mut() {
            match query::list_windows(&self.tmux, name) {
                Ok(fresh) => *windows = fresh,
                Err(e) => debug!(session = %name, error = %e, "list-windows failed; keeping previous"),
            }
        }

        self.rebuild();
        self.last_refresh = Instant::now();
    }

    fn rebuild(&mut self) {
        self.items = flatten(&self.config.projects, &self.sessions, &self.expanded);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    // ── Expansion ─────────────────────────────────────────────────────────────

    fn expand(&mut self, name: &str) -> Result<(), TmuxError> {
        let windows = query::list_windows(&self.tmux, name)?;
        self.expanded.insert(name.to_string(), windows);
        self.rebuild();
        Ok(())
    }

    fn collapse(&mut self, name: &str) {
        let row = self.cursor;
        self.expanded.remove(name);
        self.rebuild();
        if self.cursor > row {
            self.cursor = row;
        }
    }

    fn toggle(&mut self, name: &str, expanded: bool) {
        if expanded {
            self.collapse(name);
        } else if let Err(e) = self.expand(name) {
            self.error = Some(e.to_string());
        }
    }

    // ── Normal mode ───────────────────────────────────────────────────────────

    fn update_normal(&mut self, action: Action) -> Option<Msg> {
        if action != Action::None {
            self.error = None;
        }
        match action {
            Action::NavigateUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            Action::NavigateDown => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
                None
            }
            Action::Select => self.select(false),
            Action::NavigateRight => self.select(true),
            Action::NavigateLeft => {
                self.nav_left();
                None
            }
            Action::Kill => {
                if matches!(self.selected(), Some(PickerItem::Session { .. } | PickerItem::Window { .. })) {
                    self.mode = Mode::ConfirmKill;
                }
                None
            }
            Action::Rename => {
                if let Some(PickerItem::Session { name, .. }) = self.selected() {
                    self.mode = Mode::Rename(RenameModel::new(name));
                }
                None
            }
            Action::Refresh => {
                self.refresh();
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
            _ => None,
        }
    }

    /// Enter, or Right when `right` is set. They differ only on an already
    /// expanded session: Enter collapses it, Right steps into its windows.
    fn select(&mut self, right: bool) -> Option<Msg> {
        let item = self.selected()?.clone();
        match &item {
            PickerItem::Project { name, .. } => self.open_project(name),
            PickerItem::Session { name, expanded, .. } => {
                let expanded = *expanded;
                if right && expanded {
                    let next_is_window = matches!(self.items.get(self.cursor + 1), Some(PickerItem::Window { .. }));
                    if next_is_window {
                        self.cursor += 1;
                    }
                } else {
                    self.toggle(name, expanded);
                }
                None
            }
            PickerItem::Window { .. } => item.switch_target().map(Msg::SwitchTo),
        }
    }

    fn nav_left(&mut self) {
        match self.selected() {
            Some(PickerItem::Session { name, expanded: true, .. }) => {
                let name = name.clone();
                self.collapse(&name);
            }
            Some(PickerItem::Window { .. }) => {
                if let Some(parent) = parent_session_index(&self.items, self.cursor) {
                    self.cursor = parent;
                }
            }
            _ => {}
        }
    }

    fn open_project(&mut self, name: &str) -> Option<Msg> {
        let project = self.config.find_project(name)?;
        match ops::open_project(&self.tmux, &self.config, project) {
            Ok(_) => Some(Msg::SwitchTo(project.name.clone())),
            Err(e) => {
                warn!(project = name, error = %format!("{:#}", e), "open failed");
                self.error = Some(format!("{:#}", e));
                // A partly built session is still a session; show it.
                self.refresh();
                None
            }
        }
    }

    fn switch_to(&mut self, target: String) {
        self.should_quit = true;
        if self.inside_tmux {
            info!(%target, "switch-client");
            if let Err(e) = session::switch_client(&self.tmux, &target) {
                self.switch_error = Some(e.into());
            }
        } else {
            self.attach_target = Some(target);
        }
    }

    // ── ConfirmKill ───────────────────────────────────────────────────────────

    fn update_confirm(&mut self, action: Action) {
        match action {
            Action::ConfirmYes => {
                let result = match self.selected().cloned() {
                    Some(PickerItem::Session { name, .. }) => self.kill_session(&name),
                    Some(item @ PickerItem::Window { .. }) => {
                        let target = item.switch_target().unwrap_or_default();
                        session::kill_window(&self.tmux, &target)
                            .inspect(|_| info!(%target, "killed window"))
                    }
                    _ => Ok(()),
                };
                if let Err(e) = result {
                    self.error = Some(e.to_string());
                }
                self.refresh();
                self.mode = Mode::Normal;
            }
            Action::ConfirmNo => self.mode = Mode::Normal,
            _ => {}
        }
    }

    /// Killing the session this client sits in would take the picker down
    /// with it, so the client moves to a neighbor first.
    fn kill_session(&mut self, name: &str) -> Result<(), TmuxError> {
        if self.inside_tmux && query::current_session(&self.tmux).is_ok_and(|c| c == name) {
            if let Some(next) = query::neighbor_session(&self.tmux, name) {
                if let Err(e) = session::switch_client(&self.tmux, &next) {
                    warn!(session = %next, error = %e, "switch before kill failed");
                }
            }
        }
        session::kill_session(&self.tmux, name)?;
        info!(session = name, "killed session");
        Ok(())
    }

    // ── Rename ────────────────────────────────────────────────────────────────

    /// The expansion entry moves to the new name before tmux is asked, and
    /// moves back if tmux refuses.
    fn finish_rename(&mut self, old: &str, new: &str) {
        let moved = self.expanded.remove(old);
        let displaced = match &moved {
            Some(windows) => self.expanded.insert(new.to_string(), windows.clone()),
            None => None,
        };

        match session::rename_session(&self.tmux, old, new) {
            Ok(()) => info!(%old, %new, "renamed session"),
            Err(e) => {
                if let Some(windows) = moved {
                    self.expanded.insert(old.to_string(), windows);
                    match displaced {
                        Some(prev) => { self.expanded.insert(new.to_string(), prev); }
                        None => { self.expanded.remove(new); }
                    }
                }
                self.error = Some(e.to_string());
            }
        }
        self.mode = Mode::Normal;
        self.refresh();
    }
}
