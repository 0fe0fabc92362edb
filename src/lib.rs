#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`InputRegistry`**: Lock-guarded table of debounced inputs, shared by the poller and readers
//! - **`InputItem`**: Record of one input: pin, device kind, state machine position, status
//! - **`DeviceKind`**: How status follows the contact (`Button`, `HoldButton`, `Switch`)
//! - **`DebounceEngine`**: The transition function that absorbs contact bounce
//! - **`PollingDriver`**: Periodic single writer that advances every input
//! - **`PinReader`** / **`PinConfig`**: Traits to implement for your GPIO or I/O expander
//! - **`MonotonicTimer`**: Shared counter that times the debounce windows
//! - **`PeriodicTimer`**: Trait for the platform timer that fires the poll callback
//!
//! Pins are wired active-low: `PinState::Low` means the contact is asserted.

// Must stay first so the logging macros are visible to the modules below.
#[macro_use]
mod fmt;

pub mod driver;
pub mod engine;
pub mod item;
pub mod pins;
pub mod registry;
pub mod time;
pub mod types;

pub use driver::{DriverState, PeriodicTimer, PollingDriver};
pub use engine::{DebounceEngine, Transition, WindowChange};
pub use item::InputItem;
pub use pins::{HalPinError, HalPins, PinConfig, PinReader};
pub use registry::{InputRegistry, PassSummary};
pub use time::{MonotonicTimer, TickDuration, TickInstant, TickTimer, TimeDuration, TimeInstant, TimeSource};
pub use types::{DebounceConfig, DebounceState, DeviceKind, InputError, InputId};

pub use embedded_hal::digital::PinState;

#[cfg(feature = "embassy")]
pub use driver::run;
