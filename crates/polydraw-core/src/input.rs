//! Input state management for mouse/touch events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

/// Tracks pointer position and modifier state between window events.
///
/// Windowing backends report button presses without a position, so the last
/// known pointer position is kept here and attached to `Down`/`Up` events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in canvas coordinates.
    pub pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => self.pointer_position = position,
        }
    }

    /// Build a pointer event for a button change at the last known position.
    pub fn button_event(&self, button: MouseButton, pressed: bool) -> PointerEvent {
        let position = self.pointer_position;
        if pressed {
            PointerEvent::Down { position, button }
        } else {
            PointerEvent::Up { position, button }
        }
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_track_position() {
        let mut input = InputState::new();

        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert_eq!(input.pointer_position, Point::new(100.0, 100.0));

        input.handle_pointer_event(PointerEvent::Up {
            position: Point::new(120.0, 90.0),
            button: MouseButton::Right,
        });
        assert_eq!(input.pointer_position, Point::new(120.0, 90.0));
    }

    #[test]
    fn test_button_event_uses_last_position() {
        let mut input = InputState::new();
        input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(42.0, 7.0),
        });

        let event = input.button_event(MouseButton::Left, true);
        assert_eq!(
            event,
            PointerEvent::Down {
                position: Point::new(42.0, 7.0),
                button: MouseButton::Left,
            }
        );
        assert!(matches!(
            input.button_event(MouseButton::Left, false),
            PointerEvent::Up { .. }
        ));
    }

    #[test]
    fn test_command_modifier() {
        let mut input = InputState::new();
        assert!(!input.modifiers.command());
        input.set_modifiers(Modifiers {
            meta: true,
            ..Default::default()
        });
        assert!(input.modifiers.command());
    }
}
