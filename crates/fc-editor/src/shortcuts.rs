//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.
//! On macOS `meta` is ⌘; on other platforms `ctrl` serves the same role.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,
    Copy,
    Cut,
    Paste,
    Group,
    Ungroup,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
    /// Space held: the next drag pans.
    PanStart,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── Selection ──
    Deselect,
    Nudge { dir: NudgeDir, large: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDir {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDir {
    /// Unit step in world axes.
    pub fn unit(self) -> (f32, f32) {
        match self {
            NudgeDir::Left => (-1.0, 0.0),
            NudgeDir::Right => (1.0, 0.0),
            NudgeDir::Up => (0.0, -1.0),
            NudgeDir::Down => (0.0, 1.0),
        }
    }
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, mods: Modifiers) -> Option<ShortcutAction> {
        if let Some(dir) = arrow(key) {
            return (!mods.command()).then_some(ShortcutAction::Nudge {
                dir,
                large: mods.shift,
            });
        }

        // ── Modifier combos first (most specific) ──
        if mods.command() && mods.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "g" | "G" => Some(ShortcutAction::Ungroup),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if mods.command() {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "g" | "G" => Some(ShortcutAction::Group),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        // ── Single keys ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::PanStart),
            _ => None,
        }
    }
}

fn arrow(key: &str) -> Option<NudgeDir> {
    match key {
        "ArrowLeft" => Some(NudgeDir::Left),
        "ArrowRight" => Some(NudgeDir::Right),
        "ArrowUp" => Some(NudgeDir::Up),
        "ArrowDown" => Some(NudgeDir::Down),
        _ => None,
    }
}
