use crate::backend::{Backend, Device};
use crate::error::{Error, Result};
use crate::types::{DeviceId, DeviceInfo, RawState};
use crate::warning::WarningSink;

/// Owns at most one open device handle.
///
/// The handle always belongs to the last device that was successfully
/// opened for the selected id. It stays open between captures and is only
/// replaced when the selection changes.
pub struct DeviceSession<B: Backend> {
    backend: Option<B>,
    device: Option<Box<dyn Device>>,
    warnings: Box<dyn WarningSink>,
}

impl<B: Backend> DeviceSession<B> {
    /// Creates a session over an initialized backend.
    /// A failed backend leaves the session permanently unavailable.
    pub fn new(backend: Result<B>, warnings: impl WarningSink + 'static) -> Self {
        let backend = match backend {
            Ok(backend) => Some(backend),
            Err(e) => {
                warnings.warn("Failed to initialize input subsystem", &e);
                None
            }
        };
        Self {
            backend,
            device: None,
            warnings: Box::new(warnings),
        }
    }

    /// Creates a session with no input subsystem. Nothing is ever opened.
    pub fn offline(warnings: impl WarningSink + 'static) -> Self {
        Self {
            backend: None,
            device: None,
            warnings: Box::new(warnings),
        }
    }

    /// Whether the input subsystem is usable.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Id of the currently open device.
    pub fn open_device(&self) -> Option<&DeviceId> {
        self.device.as_ref().map(|d| d.id())
    }

    /// Makes sure `selected` is open and acquired.
    ///
    /// Fails without a warning when nothing is selected or the subsystem is
    /// unavailable. Open and acquire failures are reported to the warning
    /// sink before being returned.
    pub fn ensure_open(&mut self, selected: &DeviceId) -> Result<()> {
        if self.device.as_ref().is_some_and(|d| d.id() != selected) {
            self.close();
        }

        let Some(backend) = self.backend.as_mut() else {
            return Err(Error::Unavailable);
        };

        if self.device.is_none() {
            if selected.is_none() {
                return Err(Error::NoDevice);
            }
            match open_configured(backend, selected) {
                Ok(device) => {
                    log::debug!("opened input device {selected}");
                    self.device = Some(device);
                }
                Err(e) => {
                    self.warnings.warn(
                        &format!("Failed to initialize input device {selected}"),
                        &e,
                    );
                    return Err(e);
                }
            }
        }

        let Some(device) = self.device.as_mut() else {
            return Err(Error::NoDevice);
        };
        if let Err(e) = device.acquire() {
            self.warnings
                .warn(&format!("Failed to acquire input device {selected}"), &e);
            return Err(e);
        }
        Ok(())
    }

    /// Reads the current state of the open device.
    pub fn sample(&mut self) -> Result<RawState> {
        let Some(device) = self.device.as_mut() else {
            return Err(Error::NoDevice);
        };
        match device.read_state() {
            Ok(state) => Ok(state),
            Err(e) => {
                self.warnings.warn(
                    &format!("Failed to read state of input device {}", device.id()),
                    &e,
                );
                Err(e)
            }
        }
    }

    /// Releases and closes the open device, ignoring release errors.
    pub fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            let _ = device.release();
            log::debug!("closed input device {}", device.id());
        }
    }

    pub(crate) fn enumerate(&mut self) -> Result<Vec<DeviceInfo>> {
        match self.backend.as_mut() {
            Some(backend) => backend.devices(),
            None => Err(Error::Unavailable),
        }
    }

    /// Drops the backend; the session stays unavailable afterwards.
    pub(crate) fn shut_down(&mut self) {
        self.close();
        self.backend = None;
    }

    pub(crate) fn warn(&self, message: &str, cause: &Error) {
        self.warnings.warn(message, cause);
    }
}

impl<B: Backend> Drop for DeviceSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_configured<B: Backend>(
    backend: &mut B,
    id: &DeviceId,
) -> Result<Box<dyn Device>> {
    let mut device = backend.open(id)?;
    if let Err(e) = device.configure() {
        let _ = device.release();
        return Err(e);
    }
    Ok(device)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::fake::FakeBackend;

    const PAD: &str = "03000000pad";
    const WHEEL: &str = "03000000wheel";

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str, &Error)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let log = Rc::clone(&log);
            move |message: &str, cause: &Error| {
                log.borrow_mut().push(format!("{message}: {cause}"));
            }
        };
        (log, sink)
    }

    fn session(backend: &FakeBackend) -> (DeviceSession<FakeBackend>, Rc<RefCell<Vec<String>>>) {
        let (log, sink) = recorder();
        (DeviceSession::new(Ok(backend.clone()), sink), log)
    }

    #[test]
    fn sentinel_selection_fails_silently() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        let (mut session, warnings) = session(&backend);

        let result = session.ensure_open(&DeviceId::none());

        assert!(matches!(result, Err(Error::NoDevice)));
        assert!(warnings.borrow().is_empty());
        assert_eq!(backend.opened(), 0);
    }

    #[test]
    fn unavailable_backend_fails_silently_after_init_warning() {
        let (warnings, sink) = recorder();
        let mut session = DeviceSession::<FakeBackend>::new(
            Err(Error::BackendInit("no driver".into())),
            sink,
        );
        assert_eq!(warnings.borrow().len(), 1);

        let result = session.ensure_open(&DeviceId::new(PAD));

        assert!(matches!(result, Err(Error::Unavailable)));
        assert!(!session.is_available());
        assert_eq!(warnings.borrow().len(), 1);
    }

    #[test]
    fn offline_session_is_unavailable_without_warning() {
        let (warnings, sink) = recorder();
        let mut session = DeviceSession::<FakeBackend>::offline(sink);

        assert!(!session.is_available());
        assert!(matches!(
            session.ensure_open(&DeviceId::new(PAD)),
            Err(Error::Unavailable)
        ));
        assert!(warnings.borrow().is_empty());
    }

    #[test]
    fn open_is_reused_for_same_selection() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        let (mut session, _) = session(&backend);
        let id = DeviceId::new(PAD);

        session.ensure_open(&id).expect("first open");
        session.ensure_open(&id).expect("second open");

        assert_eq!(backend.opened(), 1);
        assert_eq!(session.open_device(), Some(&id));
    }

    #[test]
    fn selection_change_releases_previous_handle() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        backend.add_device(WHEEL, "Wheel");
        let (mut session, _) = session(&backend);

        session.ensure_open(&DeviceId::new(PAD)).expect("pad opens");
        session.ensure_open(&DeviceId::new(WHEEL)).expect("wheel opens");

        assert_eq!(backend.opened(), 2);
        assert_eq!(backend.released(), 1);
        assert_eq!(backend.open_handles(), 1);
        assert_eq!(session.open_device(), Some(&DeviceId::new(WHEEL)));
    }

    #[test]
    fn switching_to_sentinel_closes_device() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        let (mut session, warnings) = session(&backend);

        session.ensure_open(&DeviceId::new(PAD)).expect("pad opens");
        let result = session.ensure_open(&DeviceId::none());

        assert!(matches!(result, Err(Error::NoDevice)));
        assert_eq!(session.open_device(), None);
        assert_eq!(backend.open_handles(), 0);
        assert!(warnings.borrow().is_empty());
    }

    #[test]
    fn configure_failure_drops_partial_handle_and_warns() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        backend.fail_configure(true);
        let (mut session, warnings) = session(&backend);

        let result = session.ensure_open(&DeviceId::new(PAD));

        assert!(result.is_err());
        assert_eq!(session.open_device(), None);
        assert_eq!(backend.open_handles(), 0);
        let warnings = warnings.borrow();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to initialize input device {03000000pad}"));
    }

    #[test]
    fn missing_device_warns_with_id() {
        let backend = FakeBackend::new();
        let (mut session, warnings) = session(&backend);

        let result = session.ensure_open(&DeviceId::new(PAD));

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(warnings.borrow()[0].contains("{03000000pad}"));
    }

    #[test]
    fn acquire_failure_keeps_handle_for_retry() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        backend.fail_acquire(true);
        let (mut session, warnings) = session(&backend);
        let id = DeviceId::new(PAD);

        assert!(session.ensure_open(&id).is_err());
        assert_eq!(session.open_device(), Some(&id));
        assert!(warnings.borrow()[0].starts_with("Failed to acquire input device"));

        backend.fail_acquire(false);
        session.ensure_open(&id).expect("retry succeeds");
        assert_eq!(backend.opened(), 1);
    }

    #[test]
    fn sample_failure_warns_and_keeps_device() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        let (mut session, warnings) = session(&backend);
        let id = DeviceId::new(PAD);
        session.ensure_open(&id).expect("pad opens");

        backend.fail_read(true);
        assert!(session.sample().is_err());
        assert!(warnings.borrow()[0].starts_with("Failed to read state of input device {03000000pad}"));
        assert_eq!(session.open_device(), Some(&id));

        backend.fail_read(false);
        backend.press_button(2);
        let state = session.sample().expect("sample succeeds");
        assert!(state.button(2));
    }

    #[test]
    fn drop_releases_device() {
        let backend = FakeBackend::with_device(PAD, "Pad");
        {
            let (mut session, _) = session(&backend);
            session.ensure_open(&DeviceId::new(PAD)).expect("pad opens");
        }
        assert_eq!(backend.released(), 1);
        assert_eq!(backend.open_handles(), 0);
    }
}
