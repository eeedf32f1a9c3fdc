// Declarative window/pane layouts.

use serde::{de, Deserialize, Deserializer};

/// Window name used when a project has no (known) layout.
pub const DEFAULT_WINDOW: &str = "main";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub windows: Vec<Window>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Window {
    pub name: String,
    /// Pane 0 is the window's own pane; the rest are split off it.
    #[serde(default)]
    pub panes: Vec<Pane>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pane {
    #[serde(default)]
    pub split: SplitDirection,
    #[serde(default, deserialize_with = "de_size")]
    pub size: Option<u8>,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Side by side.
    #[default]
    Horizontal,
    /// Stacked.
    Vertical,
}

impl Layout {
    /// One window with one plain pane.
    pub fn single(name: &str) -> Self {
        Self {
            windows: vec![Window { name: name.to_string(), panes: vec![Pane::default()] }],
        }
    }

    /// Index of the window called `name`. Later duplicates win.
    pub fn window_index(&self, name: &str) -> Option<usize> {
        self.windows.iter().rposition(|w| w.name == name)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::single(DEFAULT_WINDOW)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Number(i64),
    Text(String),
}

// Accepts 70, "70" or "70%".
fn de_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let Some(raw) = Option::<RawSize>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let value = match raw {
        RawSize::Number(n) => n,
        RawSize::Text(s) => s.trim().trim_end_matches('%').trim().parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid pane size {:?}", s)))?,
    };
    match u8::try_from(value) {
        Ok(pct) if pct <= 100 => Ok(Some(pct)),
        _ => Err(de::Error::custom(format!("pane size {} is outside 0-100%", value))),
    }
}
