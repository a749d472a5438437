//! Global keyboard shortcut handling

/// Outcome of offering a key press to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// Not a player shortcut; let the host handle it
    Ignored,

    /// Consumed; the host must suppress its default action (page scroll)
    Handled,
}

impl KeyResponse {
    /// Whether the host should call `preventDefault()`
    pub fn prevents_default(self) -> bool {
        matches!(self, KeyResponse::Handled)
    }
}

/// Spacebar, matched by physical code or by produced key
pub fn is_play_toggle(code: &str, key: &str) -> bool {
    code == "Space" || key == " "
}
