use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of buttons in the fixed report shape.
pub const MAX_BUTTONS: usize = 128;

/// Number of POV hats in the fixed report shape.
pub const MAX_POVS: usize = 4;

/// Angle reported by a POV hat that points nowhere.
pub const POV_CENTERED: i32 = -1;

const NONE_ID: &str = "00000000000000000000000000000000";

/// Opaque identifier of an input device.
///
/// Identifiers are only stable within one process run. The all-zero
/// identifier is reserved for the "no device" catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Box<str>);

impl DeviceId {
    pub fn new(id: impl Into<Box<str>>) -> Self {
        Self(id.into())
    }

    /// The "no device" sentinel.
    pub fn none() -> Self {
        Self(NONE_ID.into())
    }

    pub fn is_none(&self) -> bool {
        &*self.0 == NONE_ID || self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

/// Device catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: String,
}

impl DeviceInfo {
    pub(crate) fn none() -> Self {
        Self {
            id: DeviceId::none(),
            name: "<none>".to_string(),
        }
    }
}

/// Snapshot of the button and POV arrays of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawState {
    pub buttons: SmallVec<[bool; 32]>,
    /// Hundredths of a degree, clockwise from up, or [`POV_CENTERED`].
    pub povs: [i32; MAX_POVS],
}

impl Default for RawState {
    fn default() -> Self {
        Self {
            buttons: SmallVec::new(),
            povs: [POV_CENTERED; MAX_POVS],
        }
    }
}

impl RawState {
    /// Creates an idle state with `buttons` released buttons.
    pub fn with_buttons(buttons: usize) -> Self {
        Self {
            buttons: SmallVec::from_elem(false, buttons.min(MAX_BUTTONS)),
            ..Self::default()
        }
    }

    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    pub fn pov(&self, index: usize) -> i32 {
        self.povs.get(index).copied().unwrap_or(POV_CENTERED)
    }
}
