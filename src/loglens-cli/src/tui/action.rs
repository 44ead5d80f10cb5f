//! Global actions that bypass widget focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions handled by the app itself, before any widget sees the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    RunQuery,
    None,
}

/// Map a key event to a global [`Action`].
///
/// Only chords that must work regardless of focus live here; plain keys
/// (including `q`) belong to the focused widget, since the query editor
/// accepts free text.
pub fn map_key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('r') => Action::RunQuery,
            _ => Action::None,
        };
    }
    Action::None
}
