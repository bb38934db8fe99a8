use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use trucktweaks_input::{
    Backend, CaptureController, DeviceId, DeviceInfo, Detection, CAPTURE_TIMEOUT,
};
use trucktweaks_settings::{Action, InputBindings};

/// How a capture for an action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub action: Action,
    pub detection: Option<Detection>,
}

/// Edits the in-memory bindings through a capture controller.
///
/// A capture result overwrites the target binding, a capture without result
/// leaves it untouched.
pub(crate) struct BindingEditor<B: Backend> {
    controller: CaptureController<B, Action>,
    bindings: Rc<RefCell<InputBindings>>,
    remaining: Rc<Cell<Duration>>,
    outcome: Rc<Cell<Option<Outcome>>>,
}

impl<B: Backend> BindingEditor<B> {
    pub fn new(
        controller: CaptureController<B, Action>,
        bindings: Rc<RefCell<InputBindings>>,
    ) -> Self {
        Self {
            controller,
            bindings,
            remaining: Rc::new(Cell::new(CAPTURE_TIMEOUT)),
            outcome: Rc::new(Cell::new(None)),
        }
    }

    pub fn devices(&mut self) -> &[DeviceInfo] {
        self.controller.devices()
    }

    pub fn select_device(&mut self, id: DeviceId) {
        self.controller.select_device(id);
    }

    pub fn bindings(&self) -> InputBindings {
        *self.bindings.borrow()
    }

    pub fn is_capturing(&self, action: Action) -> bool {
        self.controller.is_capturing(&action)
    }

    pub fn is_polling(&self) -> bool {
        self.controller.is_polling()
    }

    /// Starts capturing for `action`, or stops when it is already capturing.
    pub fn assign(&mut self, action: Action) {
        self.assign_at(Instant::now(), action);
    }

    pub fn assign_at(&mut self, now: Instant, action: Action) {
        if self.controller.is_capturing(&action) {
            self.controller.stop(&action);
            return;
        }

        self.remaining.set(CAPTURE_TIMEOUT);
        let remaining = Rc::clone(&self.remaining);
        let bindings = Rc::clone(&self.bindings);
        let outcome = Rc::clone(&self.outcome);
        self.controller.start_at(
            now,
            action,
            move |left| remaining.set(left),
            move |detection| {
                if let Some(detection) = detection {
                    bindings.borrow_mut().get_mut(action).assign(detection);
                }
                outcome.set(Some(Outcome { action, detection }));
            },
        );
    }

    /// Unbinds `action`, cancelling its capture first.
    pub fn clear(&mut self, action: Action) {
        self.controller.stop(&action);
        self.bindings.borrow_mut().get_mut(action).clear();
    }

    pub fn stop(&mut self, action: Action) {
        self.controller.stop(&action);
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.controller.tick_at(now);
    }

    /// Result of the last finished capture, if not yet taken.
    pub fn take_outcome(&self) -> Option<Outcome> {
        self.outcome.take()
    }

    /// Text shown next to `action`.
    pub fn label(&self, action: Action) -> String {
        if self.controller.is_capturing(&action) {
            let remaining = self.remaining.get();
            let mut seconds = remaining.as_secs();
            if remaining.subsec_nanos() > 0 {
                seconds += 1;
            }
            return format!("Waiting for input... ({seconds})");
        }
        self.bindings.borrow().get(action).to_string()
    }
}
