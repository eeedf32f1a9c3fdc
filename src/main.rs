// tplm — tmux project layout manager
// Named projects with declarative layouts, plus an interactive session picker.

mod action;
mod app;
mod config;
mod error;
mod event;
mod model;
mod ops;
mod tmux;
mod tui;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use config::Config;
use tmux::{query, session, TmuxCli};

const LOG_ENV: &str = "TPLM_LOG";

#[derive(Parser)]
#[command(name = "tplm", version, about = "tmux project layout manager")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive project/session picker (default)
    Picker,

    /// Open a project, building its session if needed, and switch to it
    Open {
        /// Project name from the config
        project: String,
    },

    /// List configured projects and live sessions
    List,

    /// Write a starter config file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Picker);

    setup_logging(cli.debug, matches!(command, Commands::Picker))?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path().context("could not determine config directory")?,
    };

    match command {
        Commands::Init => {
            Config::write_example(&config_path)?;
            println!("Created starter config at {}", config_path.display());
            Ok(())
        }
        Commands::List => {
            let config = load_config(&config_path)?;
            let sessions = query::list_sessions(&TmuxCli).context("listing sessions")?;
            print!("{}", ops::format_list(&config, &sessions));
            Ok(())
        }
        Commands::Open { project } => {
            require_tmux()?;
            let config = load_config(&config_path)?;
            let Some(project) = config.find_project(&project) else {
                bail!("unknown project {:?} (see `tplm list`)", project);
            };
            ops::open_project(&TmuxCli, &config, project)
                .with_context(|| format!("opening {}", project.name))?;
            ops::switch_to(&TmuxCli, &project.name, session::is_inside_tmux())
        }
        Commands::Picker => {
            require_tmux()?;
            let config = load_config(&config_path)?;
            run_picker(config)
        }
    }
}

fn run_picker(config: Config) -> Result<()> {
    let mut app = App::new(config, TmuxCli, session::is_inside_tmux());

    let mut terminal = tui::init().context("terminal init failed")?;
    let result = app.run(&mut terminal);
    // Always restore terminal, even on error
    let _ = tui::restore(&mut terminal);
    result?;

    if let Some(err) = app.switch_error.take() {
        return Err(err);
    }
    if let Some(target) = app.attach_target.take() {
        session::attach_foreground(&target)?;
    }
    Ok(())
}

fn require_tmux() -> Result<()> {
    if !session::is_available() {
        bail!("tplm requires tmux on PATH");
    }
    Ok(())
}

/// A missing file at the default location is an empty config; a missing
/// `--config` file is an error.
fn load_config(path: &Path) -> Result<Config> {
    let is_default = Config::config_path().as_deref() == Some(path);
    if is_default && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file");
        return Ok(Config::default());
    }
    Config::load(path).context("run `tplm init` to create a starter config")
}

fn setup_logging(debug: bool, to_file: bool) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives)?,
        _ if debug => EnvFilter::new("debug"),
        _ => EnvFilter::new("info"),
    };

    if to_file {
        // The picker owns the screen; send logs to a file.
        let dir = dirs::cache_dir().unwrap_or_else(std::env::temp_dir).join("tplm");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("tplm.log"))?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_ansi(false).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }
    Ok(())
}
