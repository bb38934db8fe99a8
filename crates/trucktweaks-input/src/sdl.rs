use ahash::AHashMap;
use sdl2::joystick::{HatState, Joystick};
use sdl2::{JoystickSubsystem, Sdl};

use crate::backend::{Backend, Device};
use crate::error::{Error, Result};
use crate::types::{DeviceId, DeviceInfo, RawState, MAX_BUTTONS, MAX_POVS, POV_CENTERED};

const ALLOW_BACKGROUND_EVENTS: &str = "SDL_JOYSTICK_ALLOW_BACKGROUND_EVENTS";

/// SDL2 joystick backend.
///
/// SDL must live entirely within the thread that created it, so neither the
/// backend nor its devices are `Send`.
pub struct SdlBackend {
    _sdl: Sdl,
    joysticks: JoystickSubsystem,
    indices: AHashMap<DeviceId, u32>,
}

impl SdlBackend {
    pub fn new() -> Result<Self> {
        // Keep reading while the game window has focus.
        sdl2::hint::set(ALLOW_BACKGROUND_EVENTS, "1");
        let sdl = sdl2::init().map_err(Error::BackendInit)?;
        let joysticks = sdl.joystick().map_err(Error::BackendInit)?;
        // State is pulled explicitly with `update`, no event pump needed.
        joysticks.set_event_state(false);
        Ok(Self {
            _sdl: sdl,
            joysticks,
            indices: AHashMap::new(),
        })
    }

    fn scan(&mut self) -> Result<Vec<DeviceInfo>> {
        self.joysticks.update();
        let count = self.joysticks.num_joysticks().map_err(Error::Backend)?;
        let mut seen: AHashMap<String, u32> = AHashMap::new();
        let mut devices = Vec::with_capacity(count as usize);
        self.indices.clear();

        for index in 0..count {
            let guid = match self.joysticks.device_guid(index) {
                Ok(guid) => guid.to_string(),
                Err(e) => {
                    log::debug!("skipping joystick {index}: {e}");
                    continue;
                }
            };
            let name = self
                .joysticks
                .name_for_index(index)
                .unwrap_or_else(|_| format!("Joystick {index}"));

            // Identical models share a GUID; suffix the duplicates.
            let nth = seen.entry(guid.clone()).or_insert(0);
            *nth += 1;
            let id = if *nth == 1 {
                DeviceId::new(guid)
            } else {
                DeviceId::new(format!("{guid}#{nth}"))
            };

            self.indices.insert(id.clone(), index);
            devices.push(DeviceInfo { id, name });
        }
        Ok(devices)
    }
}

impl Backend for SdlBackend {
    fn devices(&mut self) -> Result<Vec<DeviceInfo>> {
        self.scan()
    }

    fn open(&mut self, id: &DeviceId) -> Result<Box<dyn Device>> {
        // Indices shift when devices come and go.
        self.scan()?;
        let index = *self
            .indices
            .get(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        let joystick = self
            .joysticks
            .open(index)
            .map_err(|e| Error::Backend(e.to_string()))?;
        Ok(Box::new(SdlDevice {
            id: id.clone(),
            subsystem: self.joysticks.clone(),
            joystick,
            buttons: 0,
            hats: 0,
        }))
    }
}

struct SdlDevice {
    id: DeviceId,
    subsystem: JoystickSubsystem,
    joystick: Joystick,
    buttons: u32,
    hats: u32,
}

impl Device for SdlDevice {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn configure(&mut self) -> Result<()> {
        sdl2::hint::set(ALLOW_BACKGROUND_EVENTS, "1");
        self.buttons = self.joystick.num_buttons().min(MAX_BUTTONS as u32);
        self.hats = self.joystick.num_hats().min(MAX_POVS as u32);
        log::debug!(
            "{} reports {} button(s), {} hat(s)",
            self.joystick.name(),
            self.buttons,
            self.hats
        );
        Ok(())
    }

    fn acquire(&mut self) -> Result<()> {
        if !self.joystick.attached() {
            return Err(Error::Detached(self.id.clone()));
        }
        Ok(())
    }

    fn read_state(&mut self) -> Result<RawState> {
        self.subsystem.update();
        if !self.joystick.attached() {
            return Err(Error::Detached(self.id.clone()));
        }

        let mut state = RawState::with_buttons(self.buttons as usize);
        for (index, pressed) in state.buttons.iter_mut().enumerate() {
            *pressed = self
                .joystick
                .button(index as u32)
                .map_err(|e| Error::Backend(e.to_string()))?;
        }
        for hat in 0..self.hats {
            let value = self
                .joystick
                .hat(hat)
                .map_err(|e| Error::Backend(e.to_string()))?;
            state.povs[hat as usize] = hat_angle(value);
        }
        Ok(state)
    }

    fn release(&mut self) -> Result<()> {
        // SDL has no acquire step; the handle closes on drop.
        Ok(())
    }
}

/// Converts a hat position to hundredths of a degree, clockwise from up.
fn hat_angle(hat: HatState) -> i32 {
    match hat {
        HatState::Centered => POV_CENTERED,
        HatState::Up => 0,
        HatState::RightUp => 4500,
        HatState::Right => 9000,
        HatState::RightDown => 13500,
        HatState::Down => 18000,
        HatState::LeftDown => 22500,
        HatState::Left => 27000,
        HatState::LeftUp => 31500,
    }
}
