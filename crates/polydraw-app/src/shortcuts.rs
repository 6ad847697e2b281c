//! Keyboard shortcut registry and documentation.

use polydraw_core::input::Modifiers;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Abandon the current gesture.
    Cancel,
    /// Remove every polygon.
    EraseAll,
    /// Switch to the next grid style.
    CycleGrid,
    /// Toggle the shortcuts overlay.
    ShowShortcuts,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub action: ShortcutAction,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        action: ShortcutAction,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Delete").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key press with `modifiers` triggers this shortcut.
    ///
    /// Ctrl matches Cmd as well. Shift is ignored for keys that are typed
    /// with it (such as `?`).
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && (!self.shift || modifiers.shift)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(
                "Escape",
                false,
                false,
                "Cancel drawing, moving or rotating",
                ShortcutAction::Cancel,
            ),
            Shortcut::new("Delete", true, false, "Erase all polygons", ShortcutAction::EraseAll),
            Shortcut::new("Backspace", true, false, "Erase all polygons", ShortcutAction::EraseAll),
            Shortcut::new("G", false, false, "Toggle grid", ShortcutAction::CycleGrid),
            Shortcut::new(
                "?",
                false,
                false,
                "Show keyboard shortcuts",
                ShortcutAction::ShowShortcuts,
            ),
        ]
    }

    /// Action bound to a key press, if any.
    pub fn action_for(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:20} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_cancels() {
        assert_eq!(
            ShortcutRegistry::action_for("Escape", Modifiers::default()),
            Some(ShortcutAction::Cancel)
        );
    }

    #[test]
    fn test_erase_all_needs_command() {
        assert_eq!(ShortcutRegistry::action_for("Delete", Modifiers::default()), None);
        assert_eq!(
            ShortcutRegistry::action_for("Delete", ctrl()),
            Some(ShortcutAction::EraseAll)
        );
        let cmd = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert_eq!(
            ShortcutRegistry::action_for("Backspace", cmd),
            Some(ShortcutAction::EraseAll)
        );
    }

    #[test]
    fn test_character_keys_ignore_case() {
        assert_eq!(
            ShortcutRegistry::action_for("g", Modifiers::default()),
            Some(ShortcutAction::CycleGrid)
        );
        assert_eq!(ShortcutRegistry::action_for("g", ctrl()), None);
    }

    #[test]
    fn test_format() {
        let all = ShortcutRegistry::all();
        assert_eq!(all[1].format(), "Ctrl+Delete");
        assert_eq!(all[0].format(), "Escape");
    }
}
