//! Platform pin access.
//!
//! The registry never owns pins. It stores an opaque pin reference `P` and
//! goes through these traits to configure and sample it. Inputs are wired
//! active-low: [`PinState::Low`] means the contact is asserted.

use embedded_hal::digital::{InputPin, PinState};

/// Samples the level of a digital input.
pub trait PinReader<P> {
    /// Platform read error.
    type Error;

    /// Returns the current level of `pin`.
    fn read_level(&mut self, pin: &P) -> Result<PinState, Self::Error>;
}

/// One-time setup of a pin as a digital input.
pub trait PinConfig<P> {
    /// Platform configuration error.
    type Error;

    /// Configures `pin` as an input with pull-up.
    fn configure_input(&mut self, pin: &P) -> Result<(), Self::Error>;
}

/// Errors from [`HalPins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalPinError<E> {
    /// The pin index is outside the bank.
    UnknownPin(usize),

    /// The underlying HAL pin reported an error.
    Pin(E),
}

/// A bank of `embedded-hal` input pins addressed by index.
///
/// Pins handed to the bank are already configured by the HAL's type state,
/// so configuration only checks that the index exists.
pub struct HalPins<Pin, const N: usize> {
    pins: [Pin; N],
}

impl<Pin: InputPin, const N: usize> HalPins<Pin, N> {
    /// Wraps an array of HAL input pins.
    pub fn new(pins: [Pin; N]) -> Self {
        Self { pins }
    }
}

impl<Pin: InputPin, const N: usize> PinReader<usize> for HalPins<Pin, N> {
    type Error = HalPinError<Pin::Error>;

    fn read_level(&mut self, pin: &usize) -> Result<PinState, Self::Error> {
        let hal_pin = self
            .pins
            .get_mut(*pin)
            .ok_or(HalPinError::UnknownPin(*pin))?;

        let low = hal_pin.is_low().map_err(HalPinError::Pin)?;
        Ok(PinState::from(!low))
    }
}

impl<Pin: InputPin, const N: usize> PinConfig<usize> for HalPins<Pin, N> {
    type Error = HalPinError<Pin::Error>;

    fn configure_input(&mut self, pin: &usize) -> Result<(), Self::Error> {
        if *pin < N {
            Ok(())
        } else {
            Err(HalPinError::UnknownPin(*pin))
        }
    }
}
