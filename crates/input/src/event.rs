use glam::Vec2;
use orbitview_common::PixelSize;

use crate::listener::ListenerKind;

/// Mouse or pen button that produced a press/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A platform-neutral window event.
///
/// Positions are in window pixel coordinates, origin top-left, +y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The container changed size.
    Resized(PixelSize),
    PointerDown { position: Vec2, button: PointerButton },
    PointerMove { position: Vec2 },
    PointerUp { position: Vec2, button: PointerButton },
    /// Scroll wheel; positive `delta` scrolls toward the user (zoom out).
    Wheel { delta: f32 },
}

impl InputEvent {
    /// The window listener kind this event is dispatched to, if any.
    /// Wheel input is only consumed by the orbit bindings.
    pub fn listener_kind(&self) -> Option<ListenerKind> {
        match self {
            InputEvent::Resized(_) => Some(ListenerKind::Resize),
            InputEvent::PointerDown { .. } => Some(ListenerKind::PointerDown),
            InputEvent::PointerMove { .. } => Some(ListenerKind::PointerMove),
            InputEvent::PointerUp { .. } => Some(ListenerKind::PointerUp),
            InputEvent::Wheel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_map_to_listeners() {
        let down = InputEvent::PointerDown {
            position: Vec2::new(1.0, 2.0),
            button: PointerButton::Primary,
        };
        assert_eq!(down.listener_kind(), Some(ListenerKind::PointerDown));

        let up = InputEvent::PointerUp {
            position: Vec2::ZERO,
            button: PointerButton::Secondary,
        };
        assert_eq!(up.listener_kind(), Some(ListenerKind::PointerUp));
    }

    #[test]
    fn resize_maps_to_resize_listener() {
        let e = InputEvent::Resized(PixelSize::new(800, 600));
        assert_eq!(e.listener_kind(), Some(ListenerKind::Resize));
    }

    #[test]
    fn wheel_has_no_window_listener() {
        assert_eq!(InputEvent::Wheel { delta: 1.0 }.listener_kind(), None);
    }
}
