//! Translation of window events into canvas pointer events.

use kurbo::Point;
use polydraw_core::input::{InputState, Modifiers, MouseButton, PointerEvent};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, TouchPhase};

/// Converts winit mouse and touch events into [`PointerEvent`]s in logical
/// canvas coordinates.
///
/// Only one touch drives the canvas at a time; it is reported as the left
/// button. Further fingers are ignored until it lifts.
#[derive(Debug)]
pub struct EventHandler {
    /// Pointer and modifier state.
    pub input: InputState,
    /// Device pixels per logical pixel.
    scale_factor: f64,
    /// Id of the touch currently acting as the primary pointer.
    active_touch: Option<u64>,
}

impl EventHandler {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            input: InputState::new(),
            scale_factor,
            active_touch: None,
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    fn to_canvas(&self, position: PhysicalPosition<f64>) -> Point {
        let logical = position.to_logical::<f64>(self.scale_factor);
        Point::new(logical.x, logical.y)
    }

    /// Cursor moved to a physical window position.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> PointerEvent {
        let event = PointerEvent::Move {
            position: self.to_canvas(position),
        };
        self.input.handle_pointer_event(event);
        event
    }

    /// Mouse button changed. Returns `None` for buttons the canvas does not track.
    pub fn mouse_input(
        &mut self,
        state: ElementState,
        button: winit::event::MouseButton,
    ) -> Option<PointerEvent> {
        let button = match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => return None,
        };
        let event = self
            .input
            .button_event(button, state == ElementState::Pressed);
        self.input.handle_pointer_event(event);
        Some(event)
    }

    /// Touch event for finger `id` at a physical window position.
    pub fn touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        location: PhysicalPosition<f64>,
    ) -> Option<PointerEvent> {
        let position = self.to_canvas(location);
        let event = match phase {
            TouchPhase::Started if self.active_touch.is_none() => {
                self.active_touch = Some(id);
                PointerEvent::Down {
                    position,
                    button: MouseButton::Left,
                }
            }
            TouchPhase::Moved if self.active_touch == Some(id) => PointerEvent::Move { position },
            TouchPhase::Ended | TouchPhase::Cancelled if self.active_touch == Some(id) => {
                self.active_touch = None;
                PointerEvent::Up {
                    position,
                    button: MouseButton::Left,
                }
            }
            _ => return None,
        };
        self.input.handle_pointer_event(event);
        Some(event)
    }

    pub fn set_modifiers(&mut self, state: winit::keyboard::ModifiersState) {
        self.input.set_modifiers(Modifiers {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        });
    }

    pub fn modifiers(&self) -> Modifiers {
        self.input.modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::ModifiersState;

    #[test]
    fn test_cursor_position_is_logical() {
        let mut handler = EventHandler::new(2.0);
        let event = handler.cursor_moved(PhysicalPosition::new(200.0, 100.0));
        assert_eq!(
            event,
            PointerEvent::Move {
                position: Point::new(100.0, 50.0)
            }
        );
    }

    #[test]
    fn test_mouse_press_uses_cursor_position() {
        let mut handler = EventHandler::new(1.0);
        handler.cursor_moved(PhysicalPosition::new(30.0, 40.0));
        let event = handler.mouse_input(ElementState::Pressed, winit::event::MouseButton::Left);
        assert_eq!(
            event,
            Some(PointerEvent::Down {
                position: Point::new(30.0, 40.0),
                button: MouseButton::Left,
            })
        );

        handler.cursor_moved(PhysicalPosition::new(35.0, 40.0));
        let released = handler.mouse_input(ElementState::Released, winit::event::MouseButton::Left);
        assert_eq!(
            released,
            Some(PointerEvent::Up {
                position: Point::new(35.0, 40.0),
                button: MouseButton::Left,
            })
        );
        assert!(handler
            .mouse_input(ElementState::Pressed, winit::event::MouseButton::Back)
            .is_none());
    }

    #[test]
    fn test_single_touch_drives_pointer() {
        let mut handler = EventHandler::new(1.0);
        let down = handler.touch(7, TouchPhase::Started, PhysicalPosition::new(10.0, 10.0));
        assert!(matches!(
            down,
            Some(PointerEvent::Down {
                button: MouseButton::Left,
                ..
            })
        ));

        // A second finger is ignored
        assert!(handler
            .touch(8, TouchPhase::Started, PhysicalPosition::new(50.0, 50.0))
            .is_none());
        assert!(handler
            .touch(8, TouchPhase::Moved, PhysicalPosition::new(60.0, 50.0))
            .is_none());

        let moved = handler.touch(7, TouchPhase::Moved, PhysicalPosition::new(20.0, 10.0));
        assert_eq!(
            moved,
            Some(PointerEvent::Move {
                position: Point::new(20.0, 10.0)
            })
        );

        let up = handler.touch(7, TouchPhase::Cancelled, PhysicalPosition::new(20.0, 10.0));
        assert!(matches!(up, Some(PointerEvent::Up { .. })));
        assert!(handler
            .touch(8, TouchPhase::Started, PhysicalPosition::new(1.0, 1.0))
            .is_some());
    }

    #[test]
    fn test_modifiers() {
        let mut handler = EventHandler::new(1.0);
        handler.set_modifiers(ModifiersState::CONTROL | ModifiersState::SHIFT);
        assert!(handler.modifiers().ctrl);
        assert!(handler.modifiers().shift);
        assert!(handler.modifiers().command());
        handler.set_modifiers(ModifiersState::empty());
        assert!(!handler.modifiers().command());
    }
}
