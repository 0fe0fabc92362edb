//! Async polling loop, built only with the `embassy` feature

#![cfg(feature = "embassy")]

mod common;
use common::*;

use core::future::Future;
use moto_inputs::{DeviceKind, DriverState, PollingDriver, TickTimer, run};

fn assert_future<F: Future>(_: &F) {}

#[test]
fn run_takes_ownership_of_a_stopped_driver() {
    let registry = TestRegistry::new();
    registry
        .register(DeviceKind::Button, 0, &mut ScriptedPins::new())
        .unwrap();

    let driver: TestDriver<'_> =
        PollingDriver::new(&registry, ScriptedPins::new(), TickTimer::new(), config());
    assert_eq!(driver.state(), DriverState::Stopped);

    // Building the future does not start the ticker
    let polling = run(driver);
    assert_future(&polling);
    drop(polling);

    assert_eq!(registry.get(moto_inputs::InputId(0)), Ok(false));
}
