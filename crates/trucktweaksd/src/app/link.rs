use std::time::{Duration, Instant};

use trucktweaks_input::{Backend, DeviceId, DeviceSession, RawState};

/// Delay before reopening a device that failed.
pub(crate) const RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Keeps the selected device open for continuous sampling.
pub(crate) struct DeviceLink {
    device: DeviceId,
    ready: bool,
    retry_at: Option<Instant>,
}

impl DeviceLink {
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            ready: false,
            retry_at: None,
        }
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Switches to another device; the next sample reopens.
    pub fn retarget<B: Backend>(&mut self, session: &mut DeviceSession<B>, device: DeviceId) {
        if self.device == device {
            return;
        }
        session.close();
        *self = Self::new(device);
    }

    /// Reads the device, reopening it at most once per [`RETRY_INTERVAL`].
    pub fn sample<B: Backend>(
        &mut self,
        session: &mut DeviceSession<B>,
        now: Instant,
    ) -> Option<RawState> {
        if self.device.is_none() {
            return None;
        }
        if !self.ready {
            if self.retry_at.is_some_and(|at| now < at) {
                return None;
            }
            if session.ensure_open(&self.device).is_err() {
                self.retry_at = Some(now + RETRY_INTERVAL);
                return None;
            }
            log::info!("using input device {}", self.device);
            self.ready = true;
        }
        match session.sample() {
            Ok(state) => Some(state),
            Err(_) => {
                session.close();
                self.ready = false;
                self.retry_at = Some(now + RETRY_INTERVAL);
                None
            }
        }
    }
}
