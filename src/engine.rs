//! Debounce state machine.
//!
//! [`DebounceEngine::evaluate`] computes the next state of one input from its
//! current record, the shared timer value and a pin sample. It has no side
//! effects of its own: the pin is sampled through the supplied closure, and
//! only in [`DebounceState::ArmedHigh`] and [`DebounceState::Stable`]. Inside
//! a debounce window the engine only looks at elapsed time, so contact bounce
//! cannot retrigger a transition.

use crate::item::InputItem;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::{DebounceState, DeviceKind};
use embedded_hal::digital::PinState;

/// Effect of a transition on the item's debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowChange {
    /// No window opens or closes.
    Keep,

    /// A window opens. The caller stamps it with the shared timer.
    Open,

    /// The open window has elapsed.
    Close,
}

/// Next state of an input as computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// State machine position after the step.
    pub state: DebounceState,
    /// Logical status after the step.
    pub status: bool,
    /// What happens to the item's debounce window.
    pub window: WindowChange,
}

impl Transition {
    fn hold<P, I: TimeInstant>(item: &InputItem<P, I>) -> Self {
        Self {
            state: item.state(),
            status: item.status(),
            window: WindowChange::Keep,
        }
    }

    fn to(state: DebounceState, status: bool, window: WindowChange) -> Self {
        Self {
            state,
            status,
            window,
        }
    }

    /// Returns true if applying this transition changes anything.
    pub fn changes<P, I: TimeInstant>(&self, item: &InputItem<P, I>) -> bool {
        self.state != item.state() || self.status != item.status()
    }
}

/// The debounce transition function for all device kinds.
#[derive(Debug, Clone, Copy)]
pub struct DebounceEngine<D: TimeDuration> {
    interval: D,
}

impl<D: TimeDuration> DebounceEngine<D> {
    /// Creates an engine with a fixed debounce window.
    pub fn new(interval: D) -> Self {
        Self { interval }
    }

    /// Computes the next state of `item`.
    ///
    /// # Arguments
    /// * `item` - Current record of the input
    /// * `now` - Current value of the shared debounce timer
    /// * `sample` - Reads the level of the item's pin
    ///
    /// # Errors
    /// Returns the sampler's error unchanged. No transition applies in that case.
    pub fn evaluate<P, I, E>(
        &self,
        item: &InputItem<P, I>,
        now: I,
        sample: impl FnOnce(&P) -> Result<PinState, E>,
    ) -> Result<Transition, E>
    where
        I: TimeInstant<Duration = D>,
    {
        let transition = match item.state() {
            DebounceState::Idle => {
                Transition::to(DebounceState::ArmedHigh, item.status(), WindowChange::Keep)
            }

            DebounceState::ArmedHigh => match sample(item.pin())? {
                PinState::Low => match item.kind() {
                    DeviceKind::Button => {
                        Transition::to(DebounceState::DebounceActive, true, WindowChange::Open)
                    }
                    DeviceKind::HoldButton => Transition::to(
                        DebounceState::DebounceActive,
                        !item.status(),
                        WindowChange::Open,
                    ),
                    DeviceKind::Switch => {
                        Transition::to(DebounceState::Stable, true, WindowChange::Keep)
                    }
                },
                PinState::High => Transition::hold(item),
            },

            DebounceState::DebounceActive => {
                if self.window_elapsed(item, now) {
                    Transition::to(DebounceState::Stable, item.status(), WindowChange::Close)
                } else {
                    Transition::hold(item)
                }
            }

            DebounceState::Stable => match sample(item.pin())? {
                PinState::High => match item.kind() {
                    DeviceKind::Button => {
                        Transition::to(DebounceState::DebounceReleased, false, WindowChange::Open)
                    }
                    DeviceKind::HoldButton => Transition::to(
                        DebounceState::DebounceReleased,
                        item.status(),
                        WindowChange::Open,
                    ),
                    // Switch releases are taken as clean, no window.
                    DeviceKind::Switch => {
                        Transition::to(DebounceState::ArmedHigh, false, WindowChange::Keep)
                    }
                },
                PinState::Low => Transition::hold(item),
            },

            DebounceState::DebounceReleased => {
                if self.window_elapsed(item, now) {
                    Transition::to(DebounceState::ArmedHigh, item.status(), WindowChange::Close)
                } else {
                    Transition::hold(item)
                }
            }
        };

        Ok(transition)
    }

    /// Strict `<`: a window whose elapsed time equals the interval is over.
    fn window_elapsed<P, I>(&self, item: &InputItem<P, I>, now: I) -> bool
    where
        I: TimeInstant<Duration = D>,
    {
        match item.window_start() {
            Some(start) => now.duration_since(start) >= self.interval,
            // A window state without a start stamp cannot hold anything back.
            None => true,
        }
    }
}
