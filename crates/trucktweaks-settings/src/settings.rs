use serde::{Deserialize, Serialize};

use trucktweaks_input::{DeviceId, InputBinding};

use crate::Action;

pub const DEFAULT_SENSITIVITY: f64 = 50.0;

/// When the controller drives the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseSimulationMode {
    #[default]
    AlwaysDisabled,
    /// On whenever the daemon runs; the focused window is not checked.
    AlwaysEnabled,
    HoldToEnable,
    PressToToggle,
}

/// One binding per [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputBindings {
    pub simulate_mouse: InputBinding,
    pub mouse_left_click: InputBinding,
    pub mouse_right_click: InputBinding,
    pub mouse_scroll_up: InputBinding,
    pub mouse_scroll_down: InputBinding,
    pub escape: InputBinding,
}

impl InputBindings {
    pub fn get(&self, action: Action) -> &InputBinding {
        match action {
            Action::SimulateMouse => &self.simulate_mouse,
            Action::MouseLeftClick => &self.mouse_left_click,
            Action::MouseRightClick => &self.mouse_right_click,
            Action::MouseScrollUp => &self.mouse_scroll_up,
            Action::MouseScrollDown => &self.mouse_scroll_down,
            Action::Escape => &self.escape,
        }
    }

    pub fn get_mut(&mut self, action: Action) -> &mut InputBinding {
        match action {
            Action::SimulateMouse => &mut self.simulate_mouse,
            Action::MouseLeftClick => &mut self.mouse_left_click,
            Action::MouseRightClick => &mut self.mouse_right_click,
            Action::MouseScrollUp => &mut self.mouse_scroll_up,
            Action::MouseScrollDown => &mut self.mouse_scroll_down,
            Action::Escape => &mut self.escape,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, &InputBinding)> {
        Action::ALL.into_iter().map(move |action| (action, self.get(action)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mouse_simulation_mode: MouseSimulationMode,
    pub mouse_simulation_sensitivity: f64,
    pub input_device_id: DeviceId,
    pub input_device_name: String,
    pub input_bindings: InputBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mouse_simulation_mode: MouseSimulationMode::default(),
            mouse_simulation_sensitivity: DEFAULT_SENSITIVITY,
            input_device_id: DeviceId::none(),
            input_device_name: String::new(),
            input_bindings: InputBindings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use trucktweaks_input::{Detection, InputType};

    use super::*;

    #[test]
    fn get_mut_targets_matching_field() {
        let mut bindings = InputBindings::default();
        bindings
            .get_mut(Action::MouseScrollDown)
            .assign(Detection::button(7));

        assert_eq!(bindings.mouse_scroll_down.kind, InputType::Button);
        assert_eq!(bindings.mouse_scroll_down.value, 7);
        assert!(bindings.mouse_scroll_up.is_unset());
    }

    #[test]
    fn iter_follows_action_order() {
        let bindings = InputBindings::default();
        let actions: Vec<Action> = bindings.iter().map(|(a, _)| a).collect();
        assert_eq!(actions, Action::ALL.to_vec());
    }
}
