use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{RawState, MAX_BUTTONS, MAX_POVS, POV_CENTERED};

/// Kind of physical source a binding points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Unset,
    Button,
    Pov0,
    Pov1,
    Pov2,
    Pov3,
}

impl InputType {
    /// POV variant for a hat index.
    pub const fn pov(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Pov0),
            1 => Some(Self::Pov1),
            2 => Some(Self::Pov2),
            3 => Some(Self::Pov3),
            _ => None,
        }
    }

    /// Hat index of a POV variant.
    pub const fn pov_index(self) -> Option<usize> {
        match self {
            Self::Pov0 => Some(0),
            Self::Pov1 => Some(1),
            Self::Pov2 => Some(2),
            Self::Pov3 => Some(3),
            _ => None,
        }
    }

    pub const fn is_pov(self) -> bool {
        self.pov_index().is_some()
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unset => "Unset",
            Self::Button => "Button",
            Self::Pov0 => "POV0",
            Self::Pov1 => "POV1",
            Self::Pov2 => "POV2",
            Self::Pov3 => "POV3",
        };
        f.write_str(name)
    }
}

/// First input found by a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Detection {
    pub kind: InputType,
    pub value: i32,
}

impl Detection {
    pub const fn button(index: i32) -> Self {
        Self {
            kind: InputType::Button,
            value: index,
        }
    }
}

/// Named POV direction, only for the four exact cardinal angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PovDirection {
    Up,
    Right,
    Down,
    Left,
}

impl PovDirection {
    pub const fn from_angle(angle: i32) -> Option<Self> {
        match angle {
            0 => Some(Self::Up),
            9000 => Some(Self::Right),
            18000 => Some(Self::Down),
            27000 => Some(Self::Left),
            _ => None,
        }
    }
}

impl fmt::Display for PovDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Stored binding that breaks the type/value invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("unset binding carries value {0}")]
    UnsetWithValue(i32),
    #[error("negative button index {0}")]
    NegativeButton(i32),
    #[error("POV angle {0} out of range")]
    AngleOutOfRange(i32),
}

/// Physical source of one logical action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    #[serde(rename = "type", default)]
    pub kind: InputType,
    #[serde(default = "unset_value")]
    pub value: i32,
}

const fn unset_value() -> i32 {
    -1
}

impl Default for InputBinding {
    fn default() -> Self {
        Self::unset()
    }
}

impl From<Detection> for InputBinding {
    fn from(detection: Detection) -> Self {
        Self {
            kind: detection.kind,
            value: detection.value,
        }
    }
}

impl InputBinding {
    pub const fn unset() -> Self {
        Self {
            kind: InputType::Unset,
            value: -1,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.kind == InputType::Unset
    }

    /// Overwrites the binding with a capture result.
    pub fn assign(&mut self, detection: Detection) {
        *self = detection.into();
    }

    pub fn clear(&mut self) {
        *self = Self::unset();
    }

    /// Checks the type/value invariants of a stored binding.
    pub fn validate(&self) -> Result<(), BindingError> {
        match self.kind {
            InputType::Unset if self.value != -1 => {
                Err(BindingError::UnsetWithValue(self.value))
            }
            InputType::Unset => Ok(()),
            InputType::Button if self.value < 0 => {
                Err(BindingError::NegativeButton(self.value))
            }
            InputType::Button => Ok(()),
            _ if self.value == POV_CENTERED => Ok(()),
            _ if !(0..36000).contains(&self.value) => {
                Err(BindingError::AngleOutOfRange(self.value))
            }
            _ => Ok(()),
        }
    }

    /// Whether the binding can match a sampled state at all.
    pub fn is_usable(&self) -> bool {
        match self.kind {
            InputType::Button => (0..MAX_BUTTONS as i32).contains(&self.value),
            InputType::Unset => false,
            _ => (0..36000).contains(&self.value),
        }
    }

    /// Whether the bound source is actuated in `state`.
    pub fn is_down(&self, state: &RawState) -> bool {
        if !self.is_usable() {
            return false;
        }
        match self.kind.pov_index() {
            Some(hat) if hat < MAX_POVS => state.pov(hat) == self.value,
            Some(_) => false,
            None => state.button(self.value as usize),
        }
    }

    /// Direction name for POV bindings on a cardinal angle.
    pub fn direction(&self) -> Option<PovDirection> {
        if self.kind.is_pov() {
            PovDirection::from_angle(self.value)
        } else {
            None
        }
    }
}

impl fmt::Display for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("<unassigned>");
        }
        write!(f, "{} {}", self.kind, self.value)?;
        if let Some(direction) = self.direction() {
            write!(f, " ({direction})")?;
        }
        Ok(())
    }
}
