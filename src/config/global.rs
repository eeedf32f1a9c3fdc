// <config_dir>/tplm/config.toml
// ref: toml crate — https://docs.rs/toml/

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::layout::Layout;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub layouts: HashMap<String, Layout>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    /// Key into `Config::layouts`.
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub on_start: Vec<OnStart>,
}

/// Command typed into pane 0 of a layout window once the session is built.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OnStart {
    pub window: String,
    pub command: String,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tplm").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse, expand `~/` in project paths and validate.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        if let Some(home) = dirs::home_dir() {
            for project in &mut config.projects {
                project.path = expand_home(&project.path, &home);
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.name.is_empty() {
                bail!("project with path {} has an empty name", project.path.display());
            }
            if !seen.insert(project.name.as_str()) {
                bail!("duplicate project name {:?}", project.name);
            }
        }
        Ok(())
    }

    pub fn find_project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// The project's declared layout, or a single "main" window when it
    /// declares none or names one that doesn't exist.
    pub fn layout_for(&self, project: &Project) -> Layout {
        project.layout.as_deref()
            .and_then(|name| self.layouts.get(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Write the starter config to `path`. Never overwrites.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        std::fs::write(path, EXAMPLE_CONFIG)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// `~/x` -> `<home>/x`, `~` -> `<home>`; anything else unchanged.
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    if path == Path::new("~") {
        return home.to_path_buf();
    }
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

pub const EXAMPLE_CONFIG: &str = r#"# tplm configuration
# Generated by `tplm init`.

[[projects]]
name = "my-api"
path = "~/Projects/my-api"
layout = "dev"

[[projects.on_start]]
window = "editor"
command = "nvim ."

[[projects.on_start]]
window = "server"
command = "echo 'start your server here'"

[[projects]]
name = "frontend"
path = "~/Projects/frontend"
layout = "fullstack"

# split: "horizontal" (side by side, default) or "vertical" (stacked)
# size: percentage of the pane being split, 70 or "70%"

[[layouts.dev.windows]]
name = "editor"
panes = [
  { size = "70%" },
  { split = "horizontal", size = "30%" },
]

[[layouts.dev.windows]]
name = "server"
panes = [{ size = "100%" }]

[[layouts.fullstack.windows]]
name = "frontend"
panes = [
  { size = "50%" },
  { split = "horizontal", size = "50%" },
]

[[layouts.fullstack.windows]]
name = "backend"
panes = [
  { size = "60%" },
  { split = "horizontal", size = "40%" },
]
"#;
