// Typed errors for tmux invocation and layout application.
// Everything above this layer speaks anyhow.

use thiserror::Error;

/// Substrings tmux prints when there is no server (or no client) to talk to.
const NO_SERVER_MARKERS: [&str; 2] = ["no server", "no current"];

#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("{command}: failed to start tmux: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("parsing {field} for {record:?}: invalid value {value:?}")]
    InvalidField {
        record: String,
        field: &'static str,
        value: String,
    },
}

impl TmuxError {
    /// True when tmux reported that no server is running. Only the session
    /// listing treats this as an empty result.
    pub fn is_no_server(&self) -> bool {
        match self {
            TmuxError::CommandFailed { stderr, .. } => {
                NO_SERVER_MARKERS.iter().any(|m| stderr.contains(m))
            }
            _ => false,
        }
    }
}

/// A failed step while reproducing a layout. Earlier steps are left in place.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("renaming window {window:?}: {source}")]
    RenameWindow {
        window: String,
        #[source]
        source: TmuxError,
    },

    #[error("creating window {window:?}: {source}")]
    CreateWindow {
        window: String,
        #[source]
        source: TmuxError,
    },

    #[error("setting directory for window {window:?}: {source}")]
    SetDirectory {
        window: String,
        #[source]
        source: TmuxError,
    },

    #[error("running command in pane {pane} of window {window:?}: {source}")]
    PaneCommand {
        window: String,
        pane: usize,
        #[source]
        source: TmuxError,
    },

    #[error("splitting pane {pane} in window {window:?}: {source}")]
    Split {
        window: String,
        pane: usize,
        #[source]
        source: TmuxError,
    },

    #[error("running on_start for window {window:?}: {source}")]
    OnStart {
        window: String,
        #[source]
        source: TmuxError,
    },
}
