//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so every view
//! binds the same keys. Ctrl and ⌘ are interchangeable.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── File ──
    New,
    Open,
    Save,
    SaveAs,

    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Deselect,

    // ── Z-order ──
    BringToFront,
    SendToBack,
}

impl ShortcutAction {
    /// Whether the view has to collect input (a file path, a confirmation)
    /// before this action can run.
    pub fn needs_view(self) -> bool {
        matches!(
            self,
            ShortcutAction::New | ShortcutAction::Open | ShortcutAction::Save | ShortcutAction::SaveAs
        )
    }
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, or `None` if the combo is unbound.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                "s" | "S" => Some(ShortcutAction::SaveAs),
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "n" | "N" => Some(ShortcutAction::New),
                "o" | "O" => Some(ShortcutAction::Open),
                "s" | "S" => Some(ShortcutAction::Save),
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "]" => Some(ShortcutAction::BringToFront),
                "[" => Some(ShortcutAction::SendToBack),
                _ => None,
            };
        }

        if modifiers.shift || modifiers.alt {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
