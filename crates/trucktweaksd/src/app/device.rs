use trucktweaks_input::{DeviceId, DeviceInfo};

/// Picks the device to use from the catalog.
///
/// The stored id wins when it is attached. Otherwise the first device with
/// the stored name is used, since ids are not stable across runs.
pub(crate) fn resolve_device(devices: &[DeviceInfo], id: &DeviceId, name: &str) -> DeviceId {
    if id.is_none() || devices.iter().any(|d| &d.id == id) {
        return id.clone();
    }
    if name.is_empty() {
        return id.clone();
    }
    match devices.iter().skip(1).find(|d| d.name == name) {
        Some(device) => {
            log::info!("device {id} not attached, using {} {}", device.name, device.id);
            device.id.clone()
        }
        None => id.clone(),
    }
}
