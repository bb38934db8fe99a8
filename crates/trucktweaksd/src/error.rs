use thiserror::Error;

use trucktweaks_settings::{Action, SettingsError, WatcherError};

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),
    #[error("failed to start input emulation: {0}")]
    Performer(#[from] enigo::NewConError),
    #[error("failed to set Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("yaml serialize error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("input subsystem is unavailable")]
    InputUnavailable,
    #[error("capture for {0} did not start")]
    CaptureNotStarted(Action),
    #[error("no input captured for {0}")]
    NothingCaptured(Action),
}
