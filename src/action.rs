// Key-level intents. `event` maps raw keys to these per mode; `app` consumes them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    Select,
    Kill,
    Rename,
    Refresh,
    Quit,

    ConfirmYes,
    ConfirmNo,

    InputChar(char),
    InputBackspace,
    InputDelete,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    InputSubmit,
    InputEscape,

    None,
}
