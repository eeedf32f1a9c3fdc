// tmux command runner. Everything else in this module goes through `Runner`
// so it can be driven by a fake server in tests.
// ref: tmux(1)

pub mod layout;
pub mod query;
pub mod session;

#[cfg(test)]
pub mod fake;

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::TmuxError;

const TMUX_BIN: &str = "tmux";

pub trait Runner {
    /// Run tmux with `args`, returning stdout minus one trailing newline.
    fn run(&self, args: &[&str]) -> Result<String, TmuxError>;

    /// Run tmux for its exit status only.
    fn run_silent(&self, args: &[&str]) -> Result<(), TmuxError> {
        self.run(args).map(|_| ())
    }
}

/// Runs the real `tmux` binary, synchronously, with no retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TmuxCli;

impl Runner for TmuxCli {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        debug!(?args, "tmux");
        let output = tmux_cmd(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| TmuxError::Spawn { command: describe(args), source })?;

        if !output.status.success() {
            return Err(TmuxError::CommandFailed {
                command: describe(args),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.ends_with('\n') {
            stdout.pop();
        }
        Ok(stdout)
    }

    fn run_silent(&self, args: &[&str]) -> Result<(), TmuxError> {
        debug!(?args, "tmux (silent)");
        let output = tmux_cmd(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| TmuxError::Spawn { command: describe(args), source })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(TmuxError::CommandFailed {
                command: describe(args),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// tmux command with pre-set args.
pub fn tmux_cmd(args: &[&str]) -> Command {
    let mut cmd = Command::new(TMUX_BIN);
    cmd.args(args);
    cmd
}

/// "tmux new-window -t api -n server", for error messages.
pub fn describe(args: &[&str]) -> String {
    let mut s = String::from(TMUX_BIN);
    for a in args {
        s.push(' ');
        s.push_str(a);
    }
    s
}
