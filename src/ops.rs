// Project/session operations. Pure business logic, no App state: these take
// explicit arguments so the picker and the CLI subcommands share them.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::{Config, Project},
    tmux::{layout, query::{self, SessionInfo}, session, Runner},
};

/// Make sure `project` has a live session, building it from its layout when
/// it doesn't. Returns true when a session was created.
///
/// A failure after `new-session` leaves the half-built session in place.
pub fn open_project(tmux: &dyn Runner, config: &Config, project: &Project) -> Result<bool> {
    if query::session_exists(tmux, &project.name) {
        return Ok(false);
    }

    session::new_session(tmux, &project.name, &project.path).context("creating session")?;

    let layout = config.layout_for(project);
    layout::apply_layout(tmux, &project.name, &layout, &project.path).context("applying layout")?;

    if !project.on_start.is_empty() {
        layout::run_on_start(tmux, &project.name, &layout, &project.on_start)
            .context("running on_start")?;
    }

    info!(session = %project.name, windows = layout.windows.len(), "created session");
    Ok(true)
}

/// Move the invoking client to `target`: switch-client inside tmux,
/// a foreground attach outside.
pub fn switch_to(tmux: &dyn Runner, target: &str, inside_tmux: bool) -> Result<()> {
    if inside_tmux {
        session::switch_client(tmux, target).with_context(|| format!("switching to {}", target))
    } else {
        session::attach_foreground(target)
    }
}

/// Plain-text report for `tplm list`.
pub fn format_list(config: &Config, sessions: &[SessionInfo]) -> String {
    let mut out = String::from("Projects:\n");
    for p in &config.projects {
        let _ = writeln!(out, "  {:<20} {}", p.name, p.path.display());
    }

    out.push_str("\nActive Sessions:\n");
    if sessions.is_empty() {
        out.push_str("  (none)\n");
    }
    for s in sessions {
        let marker = if s.attached { "*" } else { " " };
        let _ = writeln!(out, "  {} {:<20} {} windows", marker, s.name, s.windows);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Layout, OnStart, Pane, SplitDirection, Window};
    use crate::tmux::fake::FakeTmux;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_with_dev() -> Config {
        let mut layouts = HashMap::new();
        layouts.insert("dev".to_string(), Layout {
            windows: vec![
                Window { name: "editor".into(), panes: vec![Pane::default()] },
                Window {
                    name: "server".into(),
                    panes: vec![
                        Pane::default(),
                        Pane { split: SplitDirection::Vertical, size: Some(30), command: None },
                    ],
                },
            ],
        });
        Config {
            projects: vec![Project {
                name: "api".into(),
                path: PathBuf::from("/src/api"),
                layout: Some("dev".into()),
                on_start: vec![OnStart { window: "server".into(), command: "make run".into() }],
            }],
            layouts,
        }
    }

    #[test]
    fn existing_session_is_left_alone() {
        let tmux = FakeTmux::new().with_session("api", "/src/api", &["editor"]);
        let config = config_with_dev();
        assert!(!open_project(&tmux, &config, &config.projects[0]).unwrap());
        assert_eq!(tmux.calls(), vec!["has-session -t =api"]);
    }

    #[test]
    fn creates_session_then_layout_then_on_start() {
        let tmux = FakeTmux::new();
        let config = config_with_dev();
        assert!(open_project(&tmux, &config, &config.projects[0]).unwrap());

        let calls = tmux.calls();
        assert_eq!(calls[0], "has-session -t =api");
        assert_eq!(calls[1], "new-session -d -s api -c /src/api");
        assert_eq!(calls[2], "rename-window -t api:0 editor");
        let select_window = calls.iter().position(|c| c.starts_with("select-window")).unwrap();
        let on_start = calls.iter().position(|c| c == "send-keys -t api:1.0 make run Enter").unwrap();
        assert!(select_window < on_start);
        assert_eq!(tmux.window_names("api"), vec!["editor", "server"]);
    }

    #[test]
    fn prefix_named_session_is_not_reused() {
        let tmux = FakeTmux::new().with_session("api-v2", "/src/api", &["editor"]);
        let config = config_with_dev();
        assert!(open_project(&tmux, &config, &config.projects[0]).unwrap());
        assert_eq!(tmux.session_names(), vec!["api-v2", "api"]);
    }

    #[test]
    fn unknown_layout_gets_main_window() {
        let tmux = FakeTmux::new();
        let config = Config::default();
        let project = Project {
            name: "misc".into(),
            path: PathBuf::from("/tmp"),
            layout: Some("nope".into()),
            on_start: vec![],
        };
        open_project(&tmux, &config, &project).unwrap();
        assert_eq!(tmux.window_names("misc"), vec!["main"]);
        assert!(tmux.calls_to("send-keys").is_empty());
    }

    #[test]
    fn creation_failure_stops_early() {
        let tmux = FakeTmux::new();
        tmux.fail_on("new-session", "bad directory");
        let config = config_with_dev();
        let err = open_project(&tmux, &config, &config.projects[0]).unwrap_err();
        assert!(err.to_string().contains("creating session"));
        assert!(tmux.calls_to("rename-window").is_empty());
    }

    #[test]
    fn layout_failure_keeps_context() {
        let tmux = FakeTmux::new();
        tmux.fail_on("split-window", "no space for new pane");
        let config = config_with_dev();
        let err = open_project(&tmux, &config, &config.projects[0]).unwrap_err();
        assert_eq!(err.to_string(), "applying layout");
        assert!(format!("{:#}", err).contains("no space for new pane"));
        assert!(tmux.calls_to("send-keys").iter().all(|c| !c.contains("make run")));
    }

    #[test]
    fn switch_inside_tmux_uses_switch_client() {
        let tmux = FakeTmux::new();
        switch_to(&tmux, "api:1", true).unwrap();
        assert_eq!(tmux.calls(), vec!["switch-client -t api:1"]);
    }

    #[test]
    fn list_report() {
        let config = config_with_dev();
        let sessions = vec![
            SessionInfo { name: "api".into(), windows: 2, attached: true, path: "/src/api".into() },
            SessionInfo { name: "scratch".into(), windows: 1, attached: false, path: "/tmp".into() },
        ];
        let text = format_list(&config, &sessions);
        assert!(text.starts_with("Projects:\n  api"));
        assert!(text.contains("/src/api\n"));
        assert!(text.contains("  * api                  2 windows\n"));
        assert!(text.contains("    scratch              1 windows\n"));

        let empty = format_list(&Config::default(), &[]);
        assert_eq!(empty, "Projects:\n\nActive Sessions:\n  (none)\n");
    }
}
