//! Keyboard shortcuts.

use winit::keyboard::{Key, NamedKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyAction {
    ToggleBlur,
    CycleMask,
    Quit,
}

/// Map a logical key to an action. Letters match either case.
pub(super) fn key_action(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(NamedKey::Escape) => Some(KeyAction::Quit),
        Key::Character(text) => match text.to_ascii_lowercase().as_str() {
            "b" => Some(KeyAction::ToggleBlur),
            "m" => Some(KeyAction::CycleMask),
            _ => None,
        },
        _ => None,
    }
}
