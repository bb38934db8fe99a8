use trucktweaks_control::{MouseButton, Output};
use trucktweaks_input::{InputBinding, RawState};
use trucktweaks_settings::{Action, InputBindings, MouseSimulationMode, Settings};

#[derive(Debug, Clone, Copy, Default)]
struct Edge {
    held: bool,
    pressed: bool,
}

impl Edge {
    fn update(&mut self, binding: &InputBinding, state: &RawState) {
        let held = binding.is_down(state);
        self.pressed = held && !self.held;
        self.held = held;
    }
}

/// Turns sampled controller state into mouse and keyboard output.
pub(crate) struct MouseSimulator {
    mode: MouseSimulationMode,
    bindings: InputBindings,
    edges: [Edge; Action::ALL.len()],
    toggled: bool,
    left_down: bool,
    right_down: bool,
    escape_down: bool,
}

impl MouseSimulator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: settings.mouse_simulation_mode,
            bindings: settings.input_bindings,
            edges: [Edge::default(); Action::ALL.len()],
            toggled: false,
            left_down: false,
            right_down: false,
            escape_down: false,
        }
    }

    /// Picks up reloaded settings. Held outputs are released on the next
    /// sample if their new binding is not held.
    pub fn apply_settings(&mut self, settings: &Settings) {
        if self.mode != settings.mouse_simulation_mode {
            log::debug!("mouse simulation mode - {:?}", settings.mouse_simulation_mode);
            self.toggled = false;
        }
        self.mode = settings.mouse_simulation_mode;
        self.bindings = settings.input_bindings;
    }

    pub fn is_active(&self) -> bool {
        match self.mode {
            MouseSimulationMode::AlwaysDisabled => false,
            MouseSimulationMode::AlwaysEnabled => true,
            MouseSimulationMode::HoldToEnable => self.edge(Action::SimulateMouse).held,
            MouseSimulationMode::PressToToggle => self.toggled,
        }
    }

    fn edge(&self, action: Action) -> Edge {
        self.edges[action as usize]
    }

    /// Processes one sample.
    pub fn on_sample_with<F: FnMut(Output)>(&mut self, state: &RawState, mut sink: F) {
        for action in Action::ALL {
            self.edges[action as usize].update(self.bindings.get(action), state);
        }

        if self.mode == MouseSimulationMode::PressToToggle
            && self.edge(Action::SimulateMouse).pressed
        {
            self.toggled = !self.toggled;
            log::debug!("mouse simulation toggled - {}", self.toggled);
        }

        if self.is_active() {
            if self.edge(Action::MouseLeftClick).pressed && !self.left_down {
                self.left_down = true;
                sink(Output::MouseButton { button: MouseButton::Left, pressed: true });
            }
            if self.edge(Action::MouseRightClick).pressed && !self.right_down {
                self.right_down = true;
                sink(Output::MouseButton { button: MouseButton::Right, pressed: true });
            }
            if self.edge(Action::MouseScrollUp).pressed {
                sink(Output::Scroll(-1));
            }
            if self.edge(Action::MouseScrollDown).pressed {
                sink(Output::Scroll(1));
            }
        }

        if self.left_down && !self.edge(Action::MouseLeftClick).held {
            self.left_down = false;
            sink(Output::MouseButton { button: MouseButton::Left, pressed: false });
        }
        if self.right_down && !self.edge(Action::MouseRightClick).held {
            self.right_down = false;
            sink(Output::MouseButton { button: MouseButton::Right, pressed: false });
        }

        if self.edge(Action::Escape).pressed && !self.escape_down {
            self.escape_down = true;
            sink(Output::Escape { pressed: true });
        } else if self.escape_down && !self.edge(Action::Escape).held {
            self.escape_down = false;
            sink(Output::Escape { pressed: false });
        }
    }

    /// Releases every output that is still down.
    pub fn release_all_with<F: FnMut(Output)>(&mut self, mut sink: F) {
        if self.left_down {
            self.left_down = false;
            sink(Output::MouseButton { button: MouseButton::Left, pressed: false });
        }
        if self.right_down {
            self.right_down = false;
            sink(Output::MouseButton { button: MouseButton::Right, pressed: false });
        }
        if self.escape_down {
            self.escape_down = false;
            sink(Output::Escape { pressed: false });
        }
        self.edges = [Edge::default(); Action::ALL.len()];
    }
}

#[cfg(test)]
mod tests {
    use trucktweaks_input::{Detection, InputType};

    use super::*;

    fn settings(mode: MouseSimulationMode) -> Settings {
        let mut settings = Settings {
            mouse_simulation_mode: mode,
            ..Settings::default()
        };
        let bindings = &mut settings.input_bindings;
        bindings.simulate_mouse.assign(Detection::button(0));
        bindings.mouse_left_click.assign(Detection::button(1));
        bindings.mouse_right_click.assign(Detection::button(2));
        bindings.mouse_scroll_up.assign(Detection { kind: InputType::Pov0, value: 0 });
        bindings.mouse_scroll_down.assign(Detection { kind: InputType::Pov0, value: 18000 });
        bindings.escape.assign(Detection::button(3));
        settings
    }

    fn state(buttons: &[usize], pov: i32) -> RawState {
        let mut state = RawState::with_buttons(8);
        for &b in buttons {
            state.buttons[b] = true;
        }
        state.povs[0] = pov;
        state
    }

    fn sample(
        sim: &mut MouseSimulator,
        buttons: &[usize],
        pov: i32,
    ) -> Vec<Output> {
        let mut out = Vec::new();
        sim.on_sample_with(&state(buttons, pov), |o| out.push(o));
        out
    }

    const LEFT_DOWN: Output = Output::MouseButton { button: MouseButton::Left, pressed: true };
    const LEFT_UP: Output = Output::MouseButton { button: MouseButton::Left, pressed: false };

    #[test]
    fn disabled_mode_ignores_clicks() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::AlwaysDisabled));
        assert!(sample(&mut sim, &[1], -1).is_empty());
        assert!(!sim.is_active());
    }

    #[test]
    fn click_goes_down_on_press_and_up_on_release() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::AlwaysEnabled));

        assert_eq!(sample(&mut sim, &[1], -1), vec![LEFT_DOWN]);
        assert!(sample(&mut sim, &[1], -1).is_empty());
        assert_eq!(sample(&mut sim, &[], -1), vec![LEFT_UP]);
    }

    #[test]
    fn hold_to_enable_releases_click_after_mode_drops() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::HoldToEnable));

        assert!(sample(&mut sim, &[1], -1).is_empty());
        assert!(sample(&mut sim, &[], -1).is_empty());

        assert_eq!(sample(&mut sim, &[0, 1], -1), vec![LEFT_DOWN]);
        // Releasing the modifier first keeps the click until its own release.
        assert!(sample(&mut sim, &[1], -1).is_empty());
        assert_eq!(sample(&mut sim, &[], -1), vec![LEFT_UP]);
    }

    #[test]
    fn press_to_toggle_flips_on_each_press() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::PressToToggle));

        sample(&mut sim, &[0], -1);
        assert!(sim.is_active());
        sample(&mut sim, &[0], -1);
        assert!(sim.is_active());
        sample(&mut sim, &[], -1);
        sample(&mut sim, &[0], -1);
        assert!(!sim.is_active());
    }

    #[test]
    fn scroll_emits_one_notch_per_press() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::AlwaysEnabled));

        assert_eq!(sample(&mut sim, &[], 0), vec![Output::Scroll(-1)]);
        assert!(sample(&mut sim, &[], 0).is_empty());
        assert_eq!(sample(&mut sim, &[], 18000), vec![Output::Scroll(1)]);
        // A diagonal is not the bound angle.
        assert!(sample(&mut sim, &[], 13500).is_empty());
    }

    #[test]
    fn escape_works_without_simulation() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::AlwaysDisabled));

        assert_eq!(sample(&mut sim, &[3], -1), vec![Output::Escape { pressed: true }]);
        assert!(sample(&mut sim, &[3], -1).is_empty());
        assert_eq!(sample(&mut sim, &[], -1), vec![Output::Escape { pressed: false }]);
    }

    #[test]
    fn always_enabled_needs_no_binding() {
        let mut settings = settings(MouseSimulationMode::AlwaysEnabled);
        settings.input_bindings.simulate_mouse = InputBinding::default();
        let mut sim = MouseSimulator::new(&settings);

        assert!(sim.is_active());
        // Idle samples produce no output, there is no pointer motion source.
        assert!(sample(&mut sim, &[], -1).is_empty());
        assert_eq!(sample(&mut sim, &[1], -1), vec![LEFT_DOWN]);
    }

    #[test]
    fn unusable_bindings_never_fire() {
        let mut settings = settings(MouseSimulationMode::AlwaysEnabled);
        settings.input_bindings.mouse_left_click = InputBinding {
            kind: InputType::Button,
            value: 200,
        };
        let mut sim = MouseSimulator::new(&settings);

        assert!(sample(&mut sim, &[1], -1).is_empty());
    }

    #[test]
    fn release_all_lifts_held_outputs() {
        let mut sim = MouseSimulator::new(&settings(MouseSimulationMode::AlwaysEnabled));
        sample(&mut sim, &[1, 3], -1);

        let mut out = Vec::new();
        sim.release_all_with(|o| out.push(o));

        assert_eq!(out, vec![LEFT_UP, Output::Escape { pressed: false }]);
        assert!(sample(&mut sim, &[], -1).is_empty());
    }
}
