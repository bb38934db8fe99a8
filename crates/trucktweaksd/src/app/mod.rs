mod device;
mod editor;
mod link;
mod simulate;

pub(crate) use device::resolve_device;
pub(crate) use editor::{BindingEditor, Outcome};
pub(crate) use link::DeviceLink;
pub(crate) use simulate::MouseSimulator;
