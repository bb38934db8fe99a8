use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize, Serializer};

use trucktweaks_input::{DeviceId, InputBinding};

use crate::{
    Action, InputBindings, MouseSimulationMode, Settings, SettingsError,
    DEFAULT_SENSITIVITY,
};

pub(crate) const VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SettingsV1 {
    pub version: u8,
    #[serde(default)]
    pub mouse_simulation: MouseSimulationV1,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_device: Option<InputDeviceV1>,
    #[serde(default, serialize_with = "sorted")]
    pub bindings: AHashMap<String, InputBinding>,
}

fn sorted<S: Serializer>(
    bindings: &AHashMap<String, InputBinding>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    bindings
        .iter()
        .collect::<BTreeMap<_, _>>()
        .serialize(serializer)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MouseSimulationV1 {
    #[serde(default)]
    pub mode: MouseSimulationMode,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
}

impl Default for MouseSimulationV1 {
    fn default() -> Self {
        Self {
            mode: MouseSimulationMode::default(),
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

fn default_sensitivity() -> f64 {
    DEFAULT_SENSITIVITY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputDeviceV1 {
    #[serde(default)]
    pub id: DeviceId,
    #[serde(default)]
    pub name: String,
}

impl SettingsV1 {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let input_device = (!settings.input_device_id.is_none()).then(|| InputDeviceV1 {
            id: settings.input_device_id.clone(),
            name: settings.input_device_name.clone(),
        });
        let bindings = settings
            .input_bindings
            .iter()
            .filter(|(_, binding)| !binding.is_unset())
            .map(|(action, binding)| (action.key().to_string(), *binding))
            .collect();

        Self {
            version: VERSION,
            mouse_simulation: MouseSimulationV1 {
                mode: settings.mouse_simulation_mode,
                sensitivity: settings.mouse_simulation_sensitivity,
            },
            input_device,
            bindings,
        }
    }

    pub(crate) fn to_settings(&self) -> Result<Settings, SettingsError> {
        let sensitivity = self.mouse_simulation.sensitivity;
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            return Err(SettingsError::InvalidSensitivity(sensitivity));
        }

        let mut bindings = InputBindings::default();
        for (key, binding) in self.bindings.iter() {
            let action: Action = key.parse()?;
            binding
                .validate()
                .map_err(|source| SettingsError::InvalidBinding { action, source })?;
            *bindings.get_mut(action) = *binding;
        }

        let (id, name) = match &self.input_device {
            Some(device) => (device.id.clone(), device.name.clone()),
            None => (DeviceId::none(), String::new()),
        };

        Ok(Settings {
            mouse_simulation_mode: self.mouse_simulation.mode,
            mouse_simulation_sensitivity: sensitivity,
            input_device_id: id,
            input_device_name: name,
            input_bindings: bindings,
        })
    }
}
