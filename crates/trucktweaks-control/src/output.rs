use enigo::{Button, Direction};

/// Mouse button driven by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub(crate) fn to_enigo(self) -> Button {
        match self {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        }
    }
}

/// A single synthesized input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    MouseButton { button: MouseButton, pressed: bool },
    /// Wheel notches. Negative values scroll up.
    Scroll(i32),
    Escape { pressed: bool },
}

pub(crate) fn direction(pressed: bool) -> Direction {
    if pressed {
        Direction::Press
    } else {
        Direction::Release
    }
}
