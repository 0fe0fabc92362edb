#![no_std]
#![no_main]

use cortex_m_rt::entry;
use moto_inputs::{
    DebounceConfig, DeviceKind, InputRegistry, PeriodicTimer, PinConfig, PinReader, PinState,
    PollingDriver, TickDuration, TickInstant, TickTimer,
};
use panic_halt as _;

// ============================================================================
// Minimal Platform Implementation
// ============================================================================

/// Pin bank reading a fixed port image, for measuring library overhead
pub struct MinimalPort {
    idr: u16,
}

impl PinReader<u8> for MinimalPort {
    type Error = ();

    fn read_level(&mut self, pin: &u8) -> Result<PinState, ()> {
        if *pin >= 16 {
            return Err(());
        }
        self.idr = core::hint::black_box(self.idr);
        Ok(PinState::from(self.idr & (1 << *pin) != 0))
    }
}

impl PinConfig<u8> for MinimalPort {
    type Error = ();

    fn configure_input(&mut self, pin: &u8) -> Result<(), ()> {
        if *pin < 16 { Ok(()) } else { Err(()) }
    }
}

/// Periodic timer stand-in; the real one would program SysTick
pub struct MinimalTick;

impl PeriodicTimer<TickDuration> for MinimalTick {
    type Error = ();

    fn configure(&mut self, period: TickDuration) -> Result<(), ()> {
        core::hint::black_box(period);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn stop(&mut self) {}
}

static INPUTS: InputRegistry<u8, TickInstant, 8> = InputRegistry::new();

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn exercise_inputs() {
    let mut port = MinimalPort { idr: 0xffff };

    let ignition = INPUTS.register(DeviceKind::Switch, 0, &mut port);
    let starter = INPUTS.register(DeviceKind::Button, 1, &mut port);
    let hazard = INPUTS.register(DeviceKind::HoldButton, 2, &mut port);

    let config = DebounceConfig::new(TickDuration(50), TickDuration(5));
    let mut driver = PollingDriver::new(&INPUTS, port, TickTimer::new(), config);

    if driver.init(&mut MinimalTick).is_ok() {
        for _ in 0..32 {
            core::hint::black_box(driver.poll());
        }
    }

    for id in [ignition, starter, hazard].into_iter().flatten() {
        core::hint::black_box(INPUTS.get(id));
    }
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    exercise_inputs();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
