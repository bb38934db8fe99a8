mod action;
mod config_dir;
mod parse;
mod settings;
mod v1;
mod watcher;

use thiserror::Error;

use trucktweaks_input::BindingError;

pub use action::{Action, UnknownAction};
pub use config_dir::ConfigDir;
pub use parse::{load_settings, parse_settings, save_settings, serialize_settings};
pub use settings::{InputBindings, MouseSimulationMode, Settings, DEFAULT_SENSITIVITY};
pub use watcher::{SettingsEvent, SettingsEventReceiver, SettingsWatcher, WatcherError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("yaml deserialize error: {0}")]
    YamlDeserializeError(#[from] serde_yaml::Error),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),
    #[error("invalid binding for {action}: {source}")]
    InvalidBinding {
        action: Action,
        source: BindingError,
    },
    #[error("invalid mouse sensitivity: {0}")]
    InvalidSensitivity(f64),

    #[error("environment variable not set: {0}")]
    EnvVarNotSet(String),
    #[error("path is not a directory: {0}")]
    PathIsNotDirectory(String),
    #[error("path error: {0}")]
    PathError(#[from] std::io::Error),
}
