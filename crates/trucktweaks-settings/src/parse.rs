use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::v1::{SettingsV1, VERSION};
use crate::{Settings, SettingsError};

/// Parse yaml settings.
pub fn parse_settings(input: &str) -> Result<Settings, SettingsError> {
    let version = parse_version(input)?;
    match version {
        VERSION => {
            let settings: SettingsV1 = serde_yaml::from_str(input)?;
            settings.to_settings()
        }
        _ => Err(SettingsError::UnsupportedVersion(version)),
    }
}

/// Read settings from disk. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} not found, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Render settings as a current-version yaml document.
pub fn serialize_settings(settings: &Settings) -> Result<String, SettingsError> {
    let raw = SettingsV1::from_settings(settings);
    Ok(serde_yaml::to_string(&raw)?)
}

/// Write settings to disk.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let content = serialize_settings(settings)?;
    std::fs::write(path, content)?;
    log::debug!("saved settings to {}", path.display());
    Ok(())
}

/// Settings with a version.
#[derive(Debug, Clone, Deserialize)]
struct VersionedSettings {
    version: u8,
}

/// Parse the version of yaml settings.
fn parse_version(input: &str) -> Result<u8, SettingsError> {
    let raw: VersionedSettings = serde_yaml::from_str(input)?;
    Ok(raw.version)
}

#[cfg(test)]
mod tests {
    use trucktweaks_input::{BindingError, DeviceId, InputType};

    use super::*;
    use crate::{Action, MouseSimulationMode, DEFAULT_SENSITIVITY};

    const FULL: &str = r#"
version: 1
mouse_simulation:
  mode: press_to_toggle
  sensitivity: 75.5
input_device:
  id: "030000005e0400008e02000000000000"
  name: "Xbox 360 Controller"
bindings:
  simulate_mouse: { type: button, value: 4 }
  mouse_left_click: { type: pov0, value: 9000 }
  escape: { type: unset, value: -1 }
"#;

    #[test]
    fn parse_settings_yaml_error_when_version_missing() {
        let yaml = "bindings: {}\n";
        assert!(matches!(
            parse_settings(yaml),
            Err(SettingsError::YamlDeserializeError(_))
        ));
    }

    #[test]
    fn parse_settings_rejects_unknown_version() {
        assert!(matches!(
            parse_settings("version: 2\n"),
            Err(SettingsError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn parse_settings_reads_all_sections() {
        let settings = parse_settings(FULL).expect("settings should parse");

        assert_eq!(settings.mouse_simulation_mode, MouseSimulationMode::PressToToggle);
        assert_eq!(settings.mouse_simulation_sensitivity, 75.5);
        assert_eq!(
            settings.input_device_id,
            DeviceId::new("030000005e0400008e02000000000000")
        );
        assert_eq!(settings.input_device_name, "Xbox 360 Controller");

        let bindings = settings.input_bindings;
        assert_eq!(bindings.simulate_mouse.kind, InputType::Button);
        assert_eq!(bindings.simulate_mouse.value, 4);
        assert_eq!(bindings.mouse_left_click.kind, InputType::Pov0);
        assert_eq!(bindings.mouse_left_click.value, 9000);
        assert!(bindings.escape.is_unset());
        assert!(bindings.mouse_right_click.is_unset());
    }

    #[test]
    fn parse_settings_defaults_missing_sections() {
        let settings = parse_settings("version: 1\n").expect("minimal settings");

        assert_eq!(settings.mouse_simulation_mode, MouseSimulationMode::AlwaysDisabled);
        assert_eq!(settings.mouse_simulation_sensitivity, DEFAULT_SENSITIVITY);
        assert!(settings.input_device_id.is_none());
        assert!(settings.input_bindings.iter().all(|(_, b)| b.is_unset()));
    }

    #[test]
    fn parse_settings_rejects_unknown_action() {
        let yaml = "version: 1\nbindings:\n  jump: { type: button, value: 1 }\n";
        assert!(matches!(
            parse_settings(yaml),
            Err(SettingsError::UnknownAction(_))
        ));
    }

    #[test]
    fn parse_settings_rejects_broken_binding() {
        let yaml = "version: 1\nbindings:\n  escape: { type: button, value: -3 }\n";
        match parse_settings(yaml) {
            Err(SettingsError::InvalidBinding { action, source }) => {
                assert_eq!(action, Action::Escape);
                assert_eq!(source, BindingError::NegativeButton(-3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_settings_rejects_negative_sensitivity() {
        let yaml = "version: 1\nmouse_simulation:\n  sensitivity: -1.0\n";
        assert!(matches!(
            parse_settings(yaml),
            Err(SettingsError::InvalidSensitivity(_))
        ));
    }

    #[test]
    fn parse_settings_rejects_unknown_fields() {
        let yaml = "version: 1\ngame_path: C:/game.exe\n";
        assert!(matches!(
            parse_settings(yaml),
            Err(SettingsError::YamlDeserializeError(_))
        ));
    }

    #[test]
    fn serialized_settings_parse_back() {
        let settings = parse_settings(FULL).expect("settings should parse");
        let yaml = serialize_settings(&settings).expect("settings serialize");

        assert!(yaml.starts_with("version: 1\n"));
        assert!(!yaml.contains("escape"));
        assert_eq!(parse_settings(&yaml).expect("output parses"), settings);
    }

    #[test]
    fn serialize_skips_missing_device() {
        let yaml = serialize_settings(&Settings::default()).expect("settings serialize");
        assert!(!yaml.contains("input_device"));
        assert!(yaml.contains("mode: always_disabled"));
    }

    #[test]
    fn save_settings_writes_file() {
        let path = std::env::temp_dir()
            .join(format!("trucktweaks-save-{}.yaml", std::process::id()));
        let mut settings = Settings::default();
        settings.input_bindings.escape.assign(trucktweaks_input::Detection::button(9));

        save_settings(&path, &settings).expect("settings saved");

        assert_eq!(load_settings(&path).expect("settings load"), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_settings_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("trucktweaks-missing-settings.yaml");
        let _ = std::fs::remove_file(&path);
        let settings = load_settings(&path).expect("defaults");
        assert_eq!(settings, Settings::default());
    }
}
