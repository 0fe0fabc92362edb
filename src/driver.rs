//! Periodic polling of the input registry.
//!
//! [`PollingDriver`] is the single writer of an [`InputRegistry`]. The
//! platform binds [`PollingDriver::poll`] to a periodic timer interrupt (or
//! to the async [`run`] loop with the `embassy` feature). The platform must
//! not let two polls of the same driver overlap.

use crate::registry::{InputRegistry, PassSummary};
use crate::pins::PinReader;
use crate::time::{MonotonicTimer, TimeDuration, TimeInstant};
use crate::types::{DebounceConfig, InputError};

/// Platform periodic timer that invokes the polling callback.
pub trait PeriodicTimer<D: TimeDuration> {
    /// Platform timer error.
    type Error;

    /// Creates or reprograms the timer for the given period.
    fn configure(&mut self, period: D) -> Result<(), Self::Error>;

    /// Starts firing the callback.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Stops firing the callback.
    fn stop(&mut self);
}

/// Lifecycle of a polling driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Not started, or shut down. Polls are ignored.
    Stopped,
    /// Periodic timer running. Polls advance the registry.
    Running,
    /// The periodic timer could not be started. The subsystem is unusable.
    Failed,
}

/// Advances every registered input once per poll period.
///
/// Owns the pin reader and the shared debounce timer, and borrows the
/// registry so application code can keep reading from it.
///
/// # Type Parameters
/// * `'r` - Lifetime of the registry borrow
/// * `P` - Pin reference type
/// * `I` - Instant type of the debounce timer
/// * `R` - Pin reader
/// * `T` - Debounce timer
/// * `N` - Registry capacity
pub struct PollingDriver<'r, P, I, R, T, const N: usize>
where
    I: TimeInstant,
{
    registry: &'r InputRegistry<P, I, N>,
    pins: R,
    timer: T,
    config: DebounceConfig<I::Duration>,
    state: DriverState,
    missed_passes: u32,
}

impl<'r, P, I, R, T, const N: usize> PollingDriver<'r, P, I, R, T, N>
where
    I: TimeInstant,
    R: PinReader<P>,
    T: MonotonicTimer<I>,
{
    /// Creates a stopped driver.
    pub fn new(
        registry: &'r InputRegistry<P, I, N>,
        pins: R,
        timer: T,
        config: DebounceConfig<I::Duration>,
    ) -> Self {
        Self {
            registry,
            pins,
            timer,
            config,
            state: DriverState::Stopped,
            missed_passes: 0,
        }
    }

    /// Programs and starts the periodic timer that will call [`poll`](Self::poll).
    ///
    /// Calling this on a running driver does nothing. A failure is not
    /// retried and leaves the driver in [`DriverState::Failed`].
    ///
    /// # Errors
    /// Returns `InitFailed` if the periodic timer cannot be configured or started.
    pub fn init<S>(&mut self, scheduler: &mut S) -> Result<(), InputError>
    where
        S: PeriodicTimer<I::Duration>,
    {
        match self.state {
            DriverState::Running => return Ok(()),
            DriverState::Failed => return Err(InputError::InitFailed),
            DriverState::Stopped => {}
        }

        let started = scheduler
            .configure(self.config.poll_period)
            .and_then(|()| scheduler.start());

        if started.is_err() {
            warn!("input polling timer could not be started");
            self.state = DriverState::Failed;
            return Err(InputError::InitFailed);
        }

        debug!(
            "input polling started, period {} ms",
            self.config.poll_period.as_millis()
        );
        self.state = DriverState::Running;
        Ok(())
    }

    /// Stops the periodic timer. Polls arriving afterwards are ignored.
    pub fn shutdown<S>(&mut self, scheduler: &mut S)
    where
        S: PeriodicTimer<I::Duration>,
    {
        if self.state == DriverState::Running {
            scheduler.stop();
            self.state = DriverState::Stopped;
            debug!("input polling stopped");
        }
    }

    /// Runs one polling pass. This is the periodic callback body.
    ///
    /// Returns `None` if the driver is not running or if the registry stayed
    /// locked through the whole retry budget. Dropped passes are counted in
    /// [`missed_passes`](Self::missed_passes) and never reported to readers.
    pub fn poll(&mut self) -> Option<PassSummary> {
        if self.state != DriverState::Running {
            return None;
        }

        self.timer.advance(self.config.poll_period);

        match self
            .registry
            .update_all(&self.config, &mut self.pins, &mut self.timer)
        {
            Ok(summary) => Some(summary),
            Err(_) => {
                self.missed_passes = self.missed_passes.saturating_add(1);
                warn!("input poll dropped, {} so far", self.missed_passes);
                None
            }
        }
    }

    /// Returns the lifecycle state of the driver.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of passes dropped because the registry was locked.
    pub fn missed_passes(&self) -> u32 {
        self.missed_passes
    }

    /// Returns the timing and retry settings.
    pub fn config(&self) -> &DebounceConfig<I::Duration> {
        &self.config
    }

    /// Returns the shared debounce timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Returns the pin reader.
    pub fn pins(&self) -> &R {
        &self.pins
    }

    /// Returns the pin reader mutably.
    pub fn pins_mut(&mut self) -> &mut R {
        &mut self.pins
    }
}

/// Polls the registry forever on an `embassy-time` ticker.
///
/// Replaces [`PollingDriver::init`] for async firmwares: the ticker is the
/// periodic primitive, so the driver is marked running directly.
#[cfg(feature = "embassy")]
pub async fn run<'r, P, I, R, T, const N: usize>(
    mut driver: PollingDriver<'r, P, I, R, T, N>,
) -> !
where
    I: TimeInstant,
    R: PinReader<P>,
    T: MonotonicTimer<I>,
{
    // The ticker has millisecond resolution here. Never tick at zero.
    let period = embassy_time::Duration::from_millis(driver.config.poll_period.as_millis().max(1));
    let mut ticker = embassy_time::Ticker::every(period);
    driver.state = DriverState::Running;

    loop {
        ticker.next().await;
        driver.poll();
    }
}
