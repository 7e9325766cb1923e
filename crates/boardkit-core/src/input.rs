//! Input events delivered to the board's plugin chain.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Position in client coordinates.
    pub fn client_point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }

    pub fn is_shift(&self) -> bool {
        self.key == "Shift"
    }
}

/// Any event the board reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// Pointer released outside the board host.
    GlobalPointerUp(PointerEvent),
    PointerCancel(PointerEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event: BoardEvent = serde_json::from_str(r#"{"type": "pointer_down", "x": 3.0, "y": 4.0, "modifiers": {"shift": true}}"#).unwrap();
        match event {
            BoardEvent::PointerDown(pointer) => {
                assert_eq!(pointer.client_point(), Point::new(3.0, 4.0));
                assert!(pointer.modifiers.shift);
                assert_eq!(pointer.button, MouseButton::Left);
            }
            other => panic!("unexpected event {other:?}"),
        }
        let key: BoardEvent = serde_json::from_str(r#"{"type": "key_down", "key": "Escape"}"#).unwrap();
        assert_eq!(key, BoardEvent::KeyDown(KeyEvent::new("Escape")));
    }
}
