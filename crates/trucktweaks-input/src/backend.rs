use crate::error::Result;
use crate::types::{DeviceId, DeviceInfo, RawState};

/// Input subsystem able to list and open game controllers.
pub trait Backend {
    /// Lists attached game controllers in a stable order.
    fn devices(&mut self) -> Result<Vec<DeviceInfo>>;

    /// Opens a handle for the device with the given id.
    fn open(&mut self, id: &DeviceId) -> Result<Box<dyn Device>>;
}

/// Open handle to one physical device.
pub trait Device {
    fn id(&self) -> &DeviceId;

    /// Sets shared, background, non-exclusive access and the fixed
    /// buttons + POV report shape.
    fn configure(&mut self) -> Result<()>;

    /// Takes polling rights on the handle.
    fn acquire(&mut self) -> Result<()>;

    /// Reads the current button and POV arrays.
    fn read_state(&mut self) -> Result<RawState>;

    /// Gives up polling rights. The handle is closed when dropped.
    fn release(&mut self) -> Result<()>;
}
