//! Concurrency-guarded table of registered inputs.

use crate::engine::DebounceEngine;
use crate::item::InputItem;
use crate::pins::{PinConfig, PinReader};
use crate::time::{MonotonicTimer, TimeInstant};
use crate::types::{DebounceConfig, DebounceState, DeviceKind, InputError, InputId};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embedded_hal::digital::PinState;
use heapless::Vec;

type ItemTable<P, I, const N: usize> = Vec<InputItem<P, I>, N>;

/// Outcome of one polling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassSummary {
    /// Items evaluated, in registration order.
    pub visited: usize,

    /// Items whose state or status changed.
    pub changed: usize,

    /// Items left untouched because their pin could not be read.
    pub skipped: usize,

    /// Items holding an open debounce window after the pass.
    pub open_windows: usize,
}

/// Table of debounced inputs shared between the polling pass and readers.
///
/// The table sits behind a single lock that is only ever taken with
/// `try_lock`. A reader that finds it taken gets [`InputError::Busy`]
/// immediately. The polling pass holds the lock for the whole pass, so a
/// reader sees either the state before a pass or after it.
///
/// The registry is `const`-constructible and can live in a `static`:
///
/// ```
/// use moto_inputs::{InputRegistry, TickInstant};
///
/// static INPUTS: InputRegistry<u8, TickInstant, 8> = InputRegistry::new();
/// assert_eq!(INPUTS.capacity(), 8);
/// ```
///
/// # Type Parameters
/// * `P` - Pin reference understood by the platform's pin traits
/// * `I` - Instant type of the shared debounce timer
/// * `N` - Maximum number of inputs
pub struct InputRegistry<P, I: TimeInstant, const N: usize> {
    items: Mutex<CriticalSectionRawMutex, ItemTable<P, I, N>>,
}

impl<P, I: TimeInstant, const N: usize> InputRegistry<P, I, N> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new input and configures its pin.
    ///
    /// The input starts in [`DebounceState::Idle`] with status `false`.
    ///
    /// # Errors
    /// * `CapacityExceeded` - All `N` slots are taken
    /// * `Configuration` - The platform rejected the pin
    /// * `Busy` - The table is locked by another context
    pub fn register<C>(&self, kind: DeviceKind, pin: P, pins: &mut C) -> Result<InputId, InputError>
    where
        C: PinConfig<P>,
    {
        let mut items = self.lock()?;

        if items.is_full() {
            warn!("input registry full, {} slots", N);
            return Err(InputError::CapacityExceeded);
        }

        if pins.configure_input(&pin).is_err() {
            warn!("pin configuration rejected for {}", kind);
            return Err(InputError::Configuration);
        }

        let id = InputId(items.len());
        items
            .push(InputItem::new(id, kind, pin))
            .map_err(|_| InputError::CapacityExceeded)?;

        debug!("registered input {} as {}", id, kind);
        Ok(id)
    }

    /// Returns the debounced status of an input.
    ///
    /// # Errors
    /// * `NotFound` - The id was never handed out by this registry
    /// * `Busy` - The table is locked, retry later
    pub fn get(&self, id: InputId) -> Result<bool, InputError> {
        self.with_item(id, |item| item.status())
    }

    /// Returns the state machine position of an input.
    pub fn state(&self, id: InputId) -> Result<DebounceState, InputError> {
        self.with_item(id, |item| item.state())
    }

    /// Returns the device kind an input was registered with.
    pub fn kind(&self, id: InputId) -> Result<DeviceKind, InputError> {
        self.with_item(id, |item| item.kind())
    }

    /// Returns the number of registered inputs.
    pub fn len(&self) -> Result<usize, InputError> {
        Ok(self.lock()?.len())
    }

    /// Returns true if no input has been registered.
    pub fn is_empty(&self) -> Result<bool, InputError> {
        Ok(self.lock()?.is_empty())
    }

    /// Maximum number of inputs.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Runs `f` on all items while holding the table lock.
    ///
    /// The polling pass is locked out until `f` returns, so keep it short.
    pub fn inspect<R>(&self, f: impl FnOnce(&[InputItem<P, I>]) -> R) -> Result<R, InputError> {
        let items = self.lock()?;
        Ok(f(&items))
    }

    /// Advances every input by one debounce step.
    ///
    /// Called by the polling driver only. Items are visited in registration
    /// order. The lock is retried `config.lock_retries` times with a growing
    /// spin backoff. If it stays taken the pass is dropped as a whole and the
    /// next call starts from the first item again.
    ///
    /// A pin is read up to `1 + config.read_retries` times. If every read
    /// fails the item keeps its state for this pass and is counted in
    /// [`PassSummary::skipped`].
    ///
    /// The shared timer is started when a window opens while it is stopped,
    /// and stopped and reset once no item holds an open window.
    ///
    /// # Errors
    /// Returns `Busy` when the lock retry budget is exhausted.
    pub fn update_all<R, T>(
        &self,
        config: &DebounceConfig<I::Duration>,
        pins: &mut R,
        timer: &mut T,
    ) -> Result<PassSummary, InputError>
    where
        R: PinReader<P>,
        T: MonotonicTimer<I>,
    {
        let mut items = self.lock_with_backoff(config.lock_retries)?;
        let engine = DebounceEngine::new(config.debounce_interval);
        let mut summary = PassSummary::default();

        for item in items.iter_mut() {
            summary.visited += 1;

            let now = timer.now();
            let sample = |pin: &P| read_with_retries(pins, pin, config.read_retries);

            match engine.evaluate(item, now, sample) {
                Ok(transition) => {
                    if transition.changes(item) {
                        summary.changed += 1;
                        trace!(
                            "input {}: {} -> {}, status {}",
                            item.id(),
                            item.state(),
                            transition.state,
                            transition.status
                        );
                    }

                    item.apply(transition, || {
                        if !timer.is_running() {
                            timer.start();
                        }
                        timer.now()
                    });
                }
                Err(_) => {
                    summary.skipped += 1;
                    warn!("input {}: pin read failed, state held", item.id());
                }
            }

            if item.state().in_window() {
                summary.open_windows += 1;
            }
        }

        if summary.open_windows == 0 && timer.is_running() {
            timer.stop();
            timer.reset();
            trace!("all debounce windows closed, timer reset");
        }

        Ok(summary)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CriticalSectionRawMutex, ItemTable<P, I, N>>, InputError> {
        self.items.try_lock().map_err(|_| InputError::Busy)
    }

    fn lock_with_backoff(
        &self,
        retries: u8,
    ) -> Result<MutexGuard<'_, CriticalSectionRawMutex, ItemTable<P, I, N>>, InputError> {
        for attempt in 0..=retries {
            if let Ok(items) = self.items.try_lock() {
                return Ok(items);
            }

            if attempt < retries {
                for _ in 0..(1u32 << attempt.min(10)) {
                    core::hint::spin_loop();
                }
            }
        }

        warn!("input registry still locked after {} retries, pass dropped", retries);
        Err(InputError::Busy)
    }

    fn with_item<R>(
        &self,
        id: InputId,
        f: impl FnOnce(&InputItem<P, I>) -> R,
    ) -> Result<R, InputError> {
        let items = self.lock()?;
        items.get(id.0).map(f).ok_or(InputError::NotFound(id))
    }
}

impl<P, I: TimeInstant, const N: usize> Default for InputRegistry<P, I, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn read_with_retries<P, R: PinReader<P>>(
    pins: &mut R,
    pin: &P,
    retries: u8,
) -> Result<PinState, R::Error> {
    let mut attempt = 0;
    loop {
        match pins.read_level(pin) {
            Ok(level) => return Ok(level),
            Err(err) if attempt >= retries => return Err(err),
            Err(_) => attempt += 1,
        }
    }
}
