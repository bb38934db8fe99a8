use std::path::{Path, PathBuf};

use crate::watcher::{SettingsEventReceiver, SettingsWatcher, WatcherError};
use crate::SettingsError;

#[cfg(windows)]
const BASE_VAR: &str = "APPDATA";
#[cfg(windows)]
const DEFAULT_CONFIG_PATH: &str = "TruckSimVRTweaks";

#[cfg(not(windows))]
const BASE_VAR: &str = "HOME";
#[cfg(not(windows))]
const DEFAULT_CONFIG_PATH: &str = ".config/trucktweaks";

const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Directory holding the settings file.
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    pub fn new(path: Option<&Path>) -> Result<Self, SettingsError> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        } else if !path.is_dir() {
            return Err(SettingsError::PathIsNotDirectory(
                path.display().to_string(),
            ));
        }

        Ok(Self { path })
    }

    pub fn start_watcher(
        &self,
    ) -> Result<(SettingsWatcher, SettingsEventReceiver), WatcherError> {
        SettingsWatcher::new(&self.settings_path())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path.join(SETTINGS_FILE_NAME)
    }

    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let path = std::env::var(BASE_VAR)
            .map(PathBuf::from)
            .map(|p| p.join(DEFAULT_CONFIG_PATH))
            .map_err(|_| SettingsError::EnvVarNotSet(BASE_VAR.to_string()))?;

        Ok(path)
    }
}
