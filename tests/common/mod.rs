//! Shared test infrastructure for moto-inputs integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use moto_inputs::{
    DebounceConfig, InputRegistry, PeriodicTimer, PinConfig, PinReader, PinState, PollingDriver,
    TickDuration, TickInstant, TickTimer,
};

pub const PIN_COUNT: usize = 8;
pub const CAPACITY: usize = 4;

/// Debounce window used by every test.
pub const DEBOUNCE: TickDuration = TickDuration(20);

/// Poll period used by every test.
pub const PERIOD: TickDuration = TickDuration(5);

pub type TestRegistry = InputRegistry<u8, TickInstant, CAPACITY>;
pub type TestDriver<'r> = PollingDriver<'r, u8, TickInstant, ScriptedPins, TickTimer, CAPACITY>;

pub fn config() -> DebounceConfig<TickDuration> {
    DebounceConfig::new(DEBOUNCE, PERIOD)
}

// ============================================================================
// Scripted Pins
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFault {
    Bus,
    Unconfigurable,
}

/// Pin bank whose levels and read failures are set by the test.
///
/// Every pin starts released (`High`).
pub struct ScriptedPins {
    levels: [PinState; PIN_COUNT],
    pending_failures: [u8; PIN_COUNT],
    reads: [u32; PIN_COUNT],
    rejected: Option<u8>,
    configured: u32,
}

impl ScriptedPins {
    pub fn new() -> Self {
        Self {
            levels: [PinState::High; PIN_COUNT],
            pending_failures: [0; PIN_COUNT],
            reads: [0; PIN_COUNT],
            rejected: None,
            configured: 0,
        }
    }

    pub fn press(&mut self, pin: u8) {
        self.levels[pin as usize] = PinState::Low;
    }

    pub fn release(&mut self, pin: u8) {
        self.levels[pin as usize] = PinState::High;
    }

    /// Makes the next `count` reads of `pin` fail.
    pub fn fail_next(&mut self, pin: u8, count: u8) {
        self.pending_failures[pin as usize] = count;
    }

    /// Makes configuration of `pin` fail.
    pub fn reject(&mut self, pin: u8) {
        self.rejected = Some(pin);
    }

    /// Number of read attempts on `pin`, failed ones included.
    pub fn reads(&self, pin: u8) -> u32 {
        self.reads[pin as usize]
    }

    /// Number of pins successfully configured.
    pub fn configured(&self) -> u32 {
        self.configured
    }
}

impl PinReader<u8> for ScriptedPins {
    type Error = PinFault;

    fn read_level(&mut self, pin: &u8) -> Result<PinState, PinFault> {
        let idx = *pin as usize;
        if idx >= PIN_COUNT {
            return Err(PinFault::Bus);
        }

        self.reads[idx] += 1;
        if self.pending_failures[idx] > 0 {
            self.pending_failures[idx] -= 1;
            return Err(PinFault::Bus);
        }

        Ok(self.levels[idx])
    }
}

impl PinConfig<u8> for ScriptedPins {
    type Error = PinFault;

    fn configure_input(&mut self, pin: &u8) -> Result<(), PinFault> {
        if *pin as usize >= PIN_COUNT || self.rejected == Some(*pin) {
            return Err(PinFault::Unconfigurable);
        }

        self.configured += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Periodic Timer
// ============================================================================

/// Periodic timer that records how it was driven.
pub struct MockScheduler {
    pub period: Option<TickDuration>,
    pub running: bool,
    pub fail_configure: bool,
    pub fail_start: bool,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self {
            period: None,
            running: false,
            fail_configure: false,
            fail_start: false,
        }
    }
}

impl PeriodicTimer<TickDuration> for MockScheduler {
    type Error = ();

    fn configure(&mut self, period: TickDuration) -> Result<(), ()> {
        if self.fail_configure {
            return Err(());
        }
        self.period = Some(period);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ()> {
        if self.fail_start {
            return Err(());
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Creates a driver over `registry` and starts it.
pub fn running_driver(registry: &TestRegistry) -> TestDriver<'_> {
    let mut driver = PollingDriver::new(registry, ScriptedPins::new(), TickTimer::new(), config());
    driver.init(&mut MockScheduler::new()).unwrap();
    driver
}

/// Polls `count` times, failing the test if a pass is dropped.
pub fn poll_n(driver: &mut TestDriver<'_>, count: usize) {
    for _ in 0..count {
        driver.poll().expect("poll pass dropped");
    }
}
