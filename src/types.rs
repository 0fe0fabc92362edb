//! Core types shared by the engine, registry and driver.

use crate::time::TimeDuration;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Default polling period in milliseconds.
pub const DEFAULT_POLL_PERIOD_MS: u64 = 5;

/// Default number of extra lock attempts per polling pass.
pub const DEFAULT_LOCK_RETRIES: u8 = 3;

/// Default number of extra pin reads per item per polling pass.
pub const DEFAULT_READ_RETRIES: u8 = 2;

/// An identifier for a registered input.
///
/// Handed out by [`InputRegistry::register`](crate::InputRegistry::register)
/// in registration order. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputId(pub usize);

/// How the logical status of an input follows its contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceKind {
    /// Momentary push button. Status is true while pressed.
    Button,

    /// Push button that toggles its status on every completed press.
    HoldButton,

    /// Maintained switch. Status mirrors the physical position.
    Switch,
}

/// Debounce state machine position of a single input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// Freshly registered, not yet evaluated.
    Idle,

    /// Waiting for the contact to be asserted.
    ArmedHigh,

    /// Activation window open. The pin is not read.
    DebounceActive,

    /// Asserted and debounced, waiting for release.
    Stable,

    /// Release window open. The pin is not read.
    DebounceReleased,
}

impl DebounceState {
    /// Returns true for the two states that hold an open debounce window.
    pub fn in_window(self) -> bool {
        matches!(
            self,
            DebounceState::DebounceActive | DebounceState::DebounceReleased
        )
    }
}

/// Errors surfaced by the input subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// The platform rejected the pin configuration.
    Configuration,

    /// The registry has no room for another input.
    CapacityExceeded,

    /// No input with this id is registered.
    NotFound(InputId),

    /// The registry is locked by another context. Retry later.
    Busy,

    /// Reading the pin of this input failed.
    Io(InputId),

    /// The periodic polling primitive could not be created or started.
    InitFailed,
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InputError::Configuration => {
                write!(f, "pin could not be configured as an input")
            }
            InputError::CapacityExceeded => {
                write!(f, "input registry is full")
            }
            InputError::NotFound(id) => {
                write!(f, "input {} is not registered", id.0)
            }
            InputError::Busy => {
                write!(f, "input registry is busy")
            }
            InputError::Io(id) => {
                write!(f, "reading the pin of input {} failed", id.0)
            }
            InputError::InitFailed => {
                write!(f, "periodic input polling could not be started")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InputError {}

/// Timing and retry settings for debouncing and polling.
///
/// ```
/// use moto_inputs::{DebounceConfig, TickDuration};
///
/// let config = DebounceConfig::new(TickDuration(30), TickDuration(5))
///     .with_lock_retries(5)
///     .with_read_retries(1);
/// assert_eq!(config.lock_retries, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceConfig<D: TimeDuration> {
    /// Length of every debounce window.
    pub debounce_interval: D,

    /// Period between two polling passes.
    pub poll_period: D,

    /// Extra attempts to take the registry lock before a pass is dropped.
    pub lock_retries: u8,

    /// Extra pin reads before an item is skipped for the pass.
    pub read_retries: u8,
}

impl<D: TimeDuration> DebounceConfig<D> {
    /// Creates a config with the default retry budgets.
    pub fn new(debounce_interval: D, poll_period: D) -> Self {
        Self {
            debounce_interval,
            poll_period,
            lock_retries: DEFAULT_LOCK_RETRIES,
            read_retries: DEFAULT_READ_RETRIES,
        }
    }

    /// Sets the lock retry budget.
    pub fn with_lock_retries(mut self, retries: u8) -> Self {
        self.lock_retries = retries;
        self
    }

    /// Sets the pin read retry budget.
    pub fn with_read_retries(mut self, retries: u8) -> Self {
        self.read_retries = retries;
        self
    }
}

impl<D: TimeDuration> Default for DebounceConfig<D> {
    fn default() -> Self {
        Self::new(
            D::from_millis(DEFAULT_DEBOUNCE_MS),
            D::from_millis(DEFAULT_POLL_PERIOD_MS),
        )
    }
}
