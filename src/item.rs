//! Per-input record stored in the registry.

use crate::engine::{Transition, WindowChange};
use crate::time::TimeInstant;
use crate::types::{DebounceState, DeviceKind, InputId};

/// State of one registered input.
///
/// Items are created by [`InputRegistry::register`](crate::InputRegistry::register)
/// and only mutated by the polling pass. Application code sees them read-only.
#[derive(Debug, Clone)]
pub struct InputItem<P, I: TimeInstant> {
    id: InputId,
    pin: P,
    kind: DeviceKind,
    state: DebounceState,
    status: bool,
    window_start: Option<I>,
}

impl<P, I: TimeInstant> InputItem<P, I> {
    pub(crate) fn new(id: InputId, kind: DeviceKind, pin: P) -> Self {
        Self {
            id,
            pin,
            kind,
            state: DebounceState::Idle,
            status: false,
            window_start: None,
        }
    }

    /// Returns the id handed out at registration.
    pub fn id(&self) -> InputId {
        self.id
    }

    /// Returns the platform pin reference.
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Returns the device kind.
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the current state machine position.
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Debounced logical status.
    pub fn status(&self) -> bool {
        self.status
    }

    /// Timer value captured when the current window opened.
    pub fn window_start(&self) -> Option<I> {
        self.window_start
    }

    /// Applies an engine transition.
    ///
    /// `window_now` is only called when the transition opens a window and must
    /// return the shared timer value after it has been started.
    pub(crate) fn apply(&mut self, transition: Transition, window_now: impl FnOnce() -> I) {
        self.state = transition.state;
        self.status = transition.status;

        match transition.window {
            WindowChange::Keep => {}
            WindowChange::Open => self.window_start = Some(window_now()),
            WindowChange::Close => self.window_start = None,
        }
    }
}
