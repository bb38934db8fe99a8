use thiserror::Error;

use crate::types::DeviceId;

/// Error type for input device operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to initialize the backend (SDL2 or subsystems).
    #[error("Backend init failed: {0}")]
    BackendInit(String),
    /// The input subsystem was never initialized or has been shut down.
    #[error("Input subsystem unavailable")]
    Unavailable,
    /// No device is selected.
    #[error("No device selected")]
    NoDevice,
    /// Requested device was not found.
    #[error("Device not found: {0}")]
    NotFound(DeviceId),
    /// Device is no longer attached.
    #[error("Device detached: {0}")]
    Detached(DeviceId),
    /// A generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Convenient result alias for input operations.
pub type Result<T> = std::result::Result<T, Error>;
