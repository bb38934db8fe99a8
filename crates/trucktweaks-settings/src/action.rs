use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Logical action a controller input can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SimulateMouse,
    MouseLeftClick,
    MouseRightClick,
    MouseScrollUp,
    MouseScrollDown,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl Action {
    pub const ALL: [Action; 6] = [
        Action::SimulateMouse,
        Action::MouseLeftClick,
        Action::MouseRightClick,
        Action::MouseScrollUp,
        Action::MouseScrollDown,
        Action::Escape,
    ];

    /// Key used in the settings file and on the command line.
    pub const fn key(self) -> &'static str {
        match self {
            Action::SimulateMouse => "simulate_mouse",
            Action::MouseLeftClick => "mouse_left_click",
            Action::MouseRightClick => "mouse_right_click",
            Action::MouseScrollUp => "mouse_scroll_up",
            Action::MouseScrollDown => "mouse_scroll_down",
            Action::Escape => "escape",
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Action::SimulateMouse => "Simulate mouse",
            Action::MouseLeftClick => "Left click",
            Action::MouseRightClick => "Right click",
            Action::MouseScrollUp => "Scroll up",
            Action::MouseScrollDown => "Scroll down",
            Action::Escape => "Escape",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Action::ALL
            .into_iter()
            .find(|action| action.key() == normalized)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
