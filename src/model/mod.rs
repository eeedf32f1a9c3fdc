pub mod picker;
pub mod rename;
