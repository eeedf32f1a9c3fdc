pub mod global;
pub mod layout;

pub use global::{Config, OnStart, Project};
pub use layout::{Layout, Pane, SplitDirection, Window};
