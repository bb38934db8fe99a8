//! Scripted backend for exercising capture logic without hardware.
//!
//! Every clone of a [`FakeBackend`] shares the same state, so a test can keep
//! one clone to press buttons or inject failures while the session owns
//! another.

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{Backend, Device};
use crate::error::{Error, Result};
use crate::types::{DeviceId, DeviceInfo, RawState};

const FAKE_BUTTONS: usize = 16;

#[derive(Debug)]
struct FakeState {
    devices: Vec<DeviceInfo>,
    input: RawState,
    fail_enumerate: bool,
    fail_open: bool,
    fail_configure: bool,
    fail_acquire: bool,
    fail_read: bool,
    enumerations: u32,
    opened: u32,
    released: u32,
    reads: u32,
    open_handles: u32,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            input: RawState::with_buttons(FAKE_BUTTONS),
            fail_enumerate: false,
            fail_open: false,
            fail_configure: false,
            fail_acquire: false,
            fail_read: false,
            enumerations: 0,
            opened: 0,
            released: 0,
            reads: 0,
            open_handles: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with a single attached device.
    pub fn with_device(id: &str, name: &str) -> Self {
        let backend = Self::new();
        backend.add_device(id, name);
        backend
    }

    pub fn add_device(&self, id: &str, name: &str) {
        self.state.borrow_mut().devices.push(DeviceInfo {
            id: DeviceId::new(id),
            name: name.to_string(),
        });
    }

    pub fn press_button(&self, index: usize) {
        if let Some(b) = self.state.borrow_mut().input.buttons.get_mut(index) {
            *b = true;
        }
    }

    pub fn set_pov(&self, index: usize, angle: i32) {
        if let Some(p) = self.state.borrow_mut().input.povs.get_mut(index) {
            *p = angle;
        }
    }

    pub fn fail_enumerate(&self, fail: bool) {
        self.state.borrow_mut().fail_enumerate = fail;
    }

    pub fn fail_open(&self, fail: bool) {
        self.state.borrow_mut().fail_open = fail;
    }

    pub fn fail_configure(&self, fail: bool) {
        self.state.borrow_mut().fail_configure = fail;
    }

    pub fn fail_acquire(&self, fail: bool) {
        self.state.borrow_mut().fail_acquire = fail;
    }

    pub fn fail_read(&self, fail: bool) {
        self.state.borrow_mut().fail_read = fail;
    }

    pub fn enumerations(&self) -> u32 {
        self.state.borrow().enumerations
    }

    pub fn opened(&self) -> u32 {
        self.state.borrow().opened
    }

    pub fn released(&self) -> u32 {
        self.state.borrow().released
    }

    pub fn reads(&self) -> u32 {
        self.state.borrow().reads
    }

    /// Handles that were opened and not yet dropped.
    pub fn open_handles(&self) -> u32 {
        self.state.borrow().open_handles
    }
}

impl Backend for FakeBackend {
    fn devices(&mut self) -> Result<Vec<DeviceInfo>> {
        let mut state = self.state.borrow_mut();
        state.enumerations += 1;
        if state.fail_enumerate {
            return Err(Error::BackendInit("fake enumeration failure".into()));
        }
        Ok(state.devices.clone())
    }

    fn open(&mut self, id: &DeviceId) -> Result<Box<dyn Device>> {
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(Error::Backend("fake open failure".into()));
        }
        if !state.devices.iter().any(|d| &d.id == id) {
            return Err(Error::NotFound(id.clone()));
        }
        state.opened += 1;
        state.open_handles += 1;
        Ok(Box::new(FakeDevice {
            id: id.clone(),
            state: Rc::clone(&self.state),
        }))
    }
}

struct FakeDevice {
    id: DeviceId,
    state: Rc<RefCell<FakeState>>,
}

impl Device for FakeDevice {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn configure(&mut self) -> Result<()> {
        if self.state.borrow().fail_configure {
            return Err(Error::Backend("fake configure failure".into()));
        }
        Ok(())
    }

    fn acquire(&mut self) -> Result<()> {
        if self.state.borrow().fail_acquire {
            return Err(Error::Backend("fake acquire failure".into()));
        }
        Ok(())
    }

    fn read_state(&mut self) -> Result<RawState> {
        let mut state = self.state.borrow_mut();
        if state.fail_read {
            return Err(Error::Backend("fake read failure".into()));
        }
        state.reads += 1;
        Ok(state.input.clone())
    }

    fn release(&mut self) -> Result<()> {
        self.state.borrow_mut().released += 1;
        Ok(())
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.open_handles = state.open_handles.saturating_sub(1);
    }
}
