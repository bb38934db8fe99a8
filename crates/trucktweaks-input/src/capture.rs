use std::fmt::Debug;
use std::time::{Duration, Instant};

use crate::backend::Backend;
use crate::binding::{Detection, InputType};
use crate::catalog::DeviceCatalog;
use crate::session::DeviceSession;
use crate::types::{DeviceId, DeviceInfo, RawState, MAX_POVS};

/// Period of the sampling tick.
pub const SAMPLE_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// How long a capture waits for input.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// Called with the remaining time while a capture waits.
pub type ProgressFn = Box<dyn FnMut(Duration)>;

/// Called once when a capture ends, with the detected input if any.
pub type CompletionFn = Box<dyn FnOnce(Option<Detection>)>;

/// Finds the first actuated input in a sampled state.
///
/// POV hats are scanned before buttons, both in index order.
pub fn detect(state: &RawState) -> Option<Detection> {
    let pov = state
        .povs
        .iter()
        .take(MAX_POVS)
        .enumerate()
        .find(|(_, angle)| **angle >= 0)
        .and_then(|(index, angle)| {
            InputType::pov(index).map(|kind| Detection { kind, value: *angle })
        });
    if pov.is_some() {
        return pov;
    }
    state
        .buttons
        .iter()
        .position(|pressed| *pressed)
        .map(|index| Detection::button(index as i32))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Polling,
}

struct Capture<T> {
    target: T,
    progress: ProgressFn,
    completion: CompletionFn,
    started: Instant,
    last_remaining: Duration,
}

/// Polling state machine that captures the next input for one binding.
///
/// The controller owns the device session and the device catalog. It never
/// spawns threads: the owner calls [`CaptureController::tick`] every
/// [`SAMPLE_INTERVAL`] while [`CaptureController::is_polling`] is true, from
/// the same thread that starts and stops captures. At most one capture is
/// active; starting another one cancels it.
pub struct CaptureController<B: Backend, T> {
    catalog: DeviceCatalog,
    session: DeviceSession<B>,
    selected: DeviceId,
    active: Option<Capture<T>>,
}

impl<B: Backend, T: PartialEq + Debug> CaptureController<B, T> {
    pub fn new(session: DeviceSession<B>) -> Self {
        Self {
            catalog: DeviceCatalog::new(),
            session,
            selected: DeviceId::none(),
            active: None,
        }
    }

    /// Attached devices, enumerated on first call.
    pub fn devices(&mut self) -> &[DeviceInfo] {
        self.catalog.entries(&mut self.session)
    }

    pub fn selected_device(&self) -> &DeviceId {
        &self.selected
    }

    /// Changes the device used by the next capture.
    pub fn select_device(&mut self, id: DeviceId) {
        self.selected = id;
    }

    pub fn state(&self) -> CaptureState {
        if self.active.is_some() {
            CaptureState::Polling
        } else {
            CaptureState::Idle
        }
    }

    /// Whether the sampling tick is armed.
    pub fn is_polling(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_capturing(&self, target: &T) -> bool {
        self.active.as_ref().is_some_and(|c| c.target == *target)
    }

    /// Starts capturing the next input for `target`.
    pub fn start(
        &mut self,
        target: T,
        progress: impl FnMut(Duration) + 'static,
        completion: impl FnOnce(Option<Detection>) + 'static,
    ) {
        self.start_at(Instant::now(), target, progress, completion);
    }

    /// Same as [`CaptureController::start`] with an explicit start time.
    pub fn start_at(
        &mut self,
        now: Instant,
        target: T,
        progress: impl FnMut(Duration) + 'static,
        completion: impl FnOnce(Option<Detection>) + 'static,
    ) {
        if let Some(previous) = self.active.take() {
            log::debug!("capture for {:?} superseded by {target:?}", previous.target);
            (previous.completion)(None);
        }

        // Reacquire on every start: the device may have changed or been lost.
        // Failures other than "nothing selected" are reported by the session.
        if let Err(e) = self.session.ensure_open(&self.selected) {
            log::debug!("capture for {target:?} not started: {e}");
            completion(None);
            return;
        }

        log::debug!("capturing input for {target:?} from {}", self.selected);
        self.active = Some(Capture {
            target,
            progress: Box::new(progress),
            completion: Box::new(completion),
            started: now,
            last_remaining: CAPTURE_TIMEOUT,
        });
    }

    /// Cancels the capture if it targets `target`.
    pub fn stop(&mut self, target: &T) {
        if self.is_capturing(target) {
            self.finish(None);
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Runs one sampling step as of `now`.
    pub fn tick_at(&mut self, now: Instant) {
        if self.active.is_none() {
            return;
        }

        let state = match self.session.sample() {
            Ok(state) => state,
            Err(_) => {
                self.finish(None);
                return;
            }
        };

        if let Some(detection) = detect(&state) {
            log::debug!("captured {:?} {}", detection.kind, detection.value);
            self.finish(Some(detection));
            return;
        }

        let Some(capture) = self.active.as_mut() else {
            return;
        };
        let elapsed = now.saturating_duration_since(capture.started);
        let remaining = CAPTURE_TIMEOUT.saturating_sub(elapsed);
        if remaining.is_zero() {
            log::debug!("capture for {:?} timed out", capture.target);
            self.finish(None);
        } else if remaining < capture.last_remaining {
            capture.last_remaining = remaining;
            (capture.progress)(remaining);
        }
    }

    fn finish(&mut self, result: Option<Detection>) {
        if let Some(capture) = self.active.take() {
            (capture.completion)(result);
        }
    }
}

impl<B: Backend, T> Drop for CaptureController<B, T> {
    fn drop(&mut self) {
        if let Some(capture) = self.active.take() {
            (capture.completion)(None);
        }
    }
}
