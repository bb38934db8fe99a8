use std::path::{Path, PathBuf};
use std::time::Duration;
use std::fs;

use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::{Config, Error as NotifyError, RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{
    new_debouncer_opt, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use thiserror::Error;

use crate::{parse_settings, Settings, SettingsError};

const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] SettingsError),
    #[error("settings path has no parent directory: {0}")]
    NoParent(String),
}

/// Reloads the settings file whenever it changes on disk.
pub struct SettingsWatcher {
    #[allow(dead_code)]
    watcher: Debouncer<RecommendedWatcher>,
}

#[derive(Debug)]
pub enum SettingsEvent {
    Changed(Settings),
    Removed,
    Error(WatcherError),
}

type SettingsEventSender = Sender<SettingsEvent>;
pub type SettingsEventReceiver = Receiver<SettingsEvent>;

fn send_settings_event(path: &Path, tx: &SettingsEventSender) {
    let event = match fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => SettingsEvent::Changed(settings),
            Err(e) => SettingsEvent::Error(WatcherError::Parse(e)),
        },
        Err(e) => SettingsEvent::Error(WatcherError::Io(e)),
    };
    let _ = tx.send(event);
}

impl SettingsWatcher {
    pub fn new_with_sender(
        path: &Path,
        tx: SettingsEventSender,
    ) -> Result<Self, WatcherError> {
        // The file may not exist yet, so the parent directory is watched.
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| WatcherError::NoParent(path.display().to_string()))?
            .to_owned();
        let path_c: PathBuf = path.to_owned();

        let debouncer_config = notify_debouncer_mini::Config::default()
            .with_timeout(DEBOUNCE_TIMEOUT)
            .with_notify_config(Config::default());
        let mut debouncer = new_debouncer_opt::<_, RecommendedWatcher>(
            debouncer_config,
            move |events: DebounceEventResult| match events {
                Ok(events) => {
                    let touched = events.iter().any(|event| {
                        matches!(
                            event.kind,
                            DebouncedEventKind::Any
                                | DebouncedEventKind::AnyContinuous
                        ) && event.path.file_name() == path_c.file_name()
                    });
                    if !touched {
                        return;
                    }
                    if !path_c.exists() {
                        let _ = tx.send(SettingsEvent::Removed);
                    } else {
                        send_settings_event(&path_c, &tx);
                    }
                }
                Err(error) => {
                    let _ = tx.send(SettingsEvent::Error(WatcherError::Notify(error)));
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(&parent, RecursiveMode::NonRecursive)?;

        Ok(Self { watcher: debouncer })
    }

    pub fn new(path: &Path) -> Result<(Self, SettingsEventReceiver), WatcherError> {
        let (tx, rx) = unbounded();

        Ok((Self::new_with_sender(path, tx)?, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_carries_parsed_settings() {
        let dir = std::env::temp_dir()
            .join(format!("trucktweaks-watch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("dir created");
        let path = dir.join("settings.yaml");
        std::fs::write(&path, "version: 1\n").expect("settings written");

        let (tx, rx) = unbounded();
        send_settings_event(&path, &tx);

        match rx.try_recv() {
            Ok(SettingsEvent::Changed(settings)) => {
                assert_eq!(settings, Settings::default());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reload_reports_parse_error() {
        let dir = std::env::temp_dir()
            .join(format!("trucktweaks-watch-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("dir created");
        let path = dir.join("settings.yaml");
        std::fs::write(&path, "version: 9\n").expect("settings written");

        let (tx, rx) = unbounded();
        send_settings_event(&path, &tx);

        assert!(matches!(
            rx.try_recv(),
            Ok(SettingsEvent::Error(WatcherError::Parse(
                SettingsError::UnsupportedVersion(9)
            )))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reload_of_missing_file_reports_io_error() {
        let path = std::env::temp_dir()
            .join(format!("trucktweaks-watch-missing-{}", std::process::id()))
            .join("settings.yaml");

        let (tx, rx) = unbounded();
        send_settings_event(&path, &tx);

        assert!(matches!(
            rx.try_recv(),
            Ok(SettingsEvent::Error(WatcherError::Io(_)))
        ));
    }

    #[test]
    fn watcher_rejects_path_without_parent() {
        assert!(matches!(
            SettingsWatcher::new(Path::new("settings.yaml")),
            Err(WatcherError::NoParent(_))
        ));
    }
}
