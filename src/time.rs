//! Time abstraction traits and the shared debounce timer.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
///
/// Durations are compared directly, so the ordering must be exact at the
/// type's own resolution.
pub trait TimeDuration: Copy + PartialEq + PartialOrd {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// A counter that can be started, stopped and reset.
///
/// One instance is shared by every registered input. The polling pass starts
/// it when the first debounce window opens and stops and resets it once no
/// window is open, so its value only matters while a window is open.
pub trait MonotonicTimer<I: TimeInstant>: TimeSource<I> {
    /// Starts counting from the current value.
    fn start(&mut self);

    /// Freezes the counter.
    fn stop(&mut self);

    /// Sets the counter back to zero.
    fn reset(&mut self);

    /// Returns true while the counter is advancing.
    fn is_running(&self) -> bool;

    /// Called once per polling pass with the poll period.
    ///
    /// Hardware counters advance on their own and keep the default no-op.
    fn advance(&mut self, _elapsed: I::Duration) {}
}

/// Millisecond duration used by [`TickTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickDuration(pub u32);

impl TimeDuration for TickDuration {
    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        TickDuration(millis.min(u32::MAX as u64) as u32)
    }
}

/// Counter value of a [`TickTimer`], in milliseconds since the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInstant(pub u32);

impl TimeInstant for TickInstant {
    type Duration = TickDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        // The counter is free-running and may wrap.
        TickDuration(self.0.wrapping_sub(earlier.0))
    }
}

/// Software debounce timer advanced by the polling driver.
///
/// Use this on targets without a spare hardware counter. Each call to
/// [`MonotonicTimer::advance`] adds one poll period while the timer runs.
#[derive(Debug, Clone, Default)]
pub struct TickTimer {
    count: u32,
    running: bool,
}

impl TickTimer {
    /// Creates a stopped timer at zero.
    pub const fn new() -> Self {
        Self {
            count: 0,
            running: false,
        }
    }
}

impl TimeSource<TickInstant> for TickTimer {
    fn now(&self) -> TickInstant {
        TickInstant(self.count)
    }
}

impl MonotonicTimer<TickInstant> for TickTimer {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn advance(&mut self, elapsed: TickDuration) {
        if self.running {
            self.count = self.count.wrapping_add(elapsed.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_does_not_advance() {
        let mut timer = TickTimer::new();
        timer.advance(TickDuration(5));
        assert_eq!(timer.now(), TickInstant(0));
        assert!(!timer.is_running());
    }

    #[test]
    fn running_timer_accumulates_poll_periods() {
        let mut timer = TickTimer::new();
        timer.start();
        timer.advance(TickDuration(5));
        timer.advance(TickDuration(5));
        assert_eq!(timer.now(), TickInstant(10));

        timer.stop();
        timer.advance(TickDuration(5));
        assert_eq!(timer.now(), TickInstant(10));

        timer.reset();
        assert_eq!(timer.now(), TickInstant(0));
    }

    #[test]
    fn duration_since_handles_counter_wrap() {
        let earlier = TickInstant(u32::MAX - 2);
        let later = TickInstant(3);
        assert_eq!(later.duration_since(earlier), TickDuration(6));
    }

    #[test]
    fn from_millis_saturates_at_counter_width() {
        assert_eq!(TickDuration::from_millis(u64::MAX), TickDuration(u32::MAX));
        assert_eq!(TickDuration::from_millis(20).as_millis(), 20);
    }
}
