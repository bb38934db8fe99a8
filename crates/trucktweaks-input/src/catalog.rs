use std::cell::OnceCell;

use crate::backend::Backend;
use crate::session::DeviceSession;
use crate::types::DeviceInfo;

/// Attached game controllers, enumerated once on first use.
///
/// The "no device" entry always comes first. When enumeration fails the
/// catalog keeps only that entry and the session is shut down, so capture
/// stays unavailable until the process restarts.
#[derive(Debug, Default)]
pub struct DeviceCatalog {
    entries: OnceCell<Vec<DeviceInfo>>,
}

impl DeviceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog, enumerating devices through `session` the first time.
    pub fn entries<B: Backend>(&self, session: &mut DeviceSession<B>) -> &[DeviceInfo] {
        self.entries.get_or_init(|| {
            let mut entries = vec![DeviceInfo::none()];
            if !session.is_available() {
                return entries;
            }
            match session.enumerate() {
                Ok(devices) => {
                    log::debug!("enumerated {} input device(s)", devices.len());
                    entries.extend(devices);
                }
                Err(e) => {
                    session.warn("Failed to enumerate input devices", &e);
                    session.shut_down();
                }
            }
            entries
        })
    }

    /// Whether enumeration already happened.
    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }
}
