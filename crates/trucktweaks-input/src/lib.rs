//! Game controller input capture.
//!
//! The [`CaptureController`] waits for the first button or POV direction on
//! the selected device and reports it back, so it can be stored in an
//! [`InputBinding`].

mod backend;
mod binding;
mod capture;
mod catalog;
mod error;
mod session;
mod types;
mod warning;

#[cfg(any(test, feature = "fake-backend"))]
mod fake;
#[cfg(feature = "sdl2-backend")]
mod sdl;

pub use crate::backend::{Backend, Device};
pub use crate::binding::{BindingError, Detection, InputBinding, InputType, PovDirection};
pub use crate::capture::{
    detect, CaptureController, CaptureState, CompletionFn, ProgressFn, CAPTURE_TIMEOUT,
    SAMPLE_INTERVAL,
};
pub use crate::catalog::DeviceCatalog;
pub use crate::error::{Error, Result};
pub use crate::session::DeviceSession;
pub use crate::types::{DeviceId, DeviceInfo, RawState, MAX_BUTTONS, MAX_POVS, POV_CENTERED};
pub use crate::warning::{LogWarnings, WarningSink};

#[cfg(any(test, feature = "fake-backend"))]
pub use crate::fake::FakeBackend;
#[cfg(feature = "sdl2-backend")]
pub use crate::sdl::SdlBackend;
