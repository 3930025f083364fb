//! SPI transport seam shared by the strip drivers.
//!
//! Bus setup is an explicit step: [`ConfiguredBus::new`] applies a
//! [`BusConfig`] once and hands back a handle that remembers it. Drivers
//! take the handle and check that it matches their protocol, so a bus
//! configured for one protocol cannot be silently reused by another.

use core::convert::Infallible;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, MODE_0, Mode, SpiBus};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::error::Error;

/// Clock rate and signal polarity for an SPI bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// SCK frequency in Hz
    pub clock_hz: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl BusConfig {
    /// Mode 0 (clock idle low, data sampled on the leading edge) at `clock_hz`
    pub const fn mode0(clock_hz: u32) -> Self {
        Self {
            clock_hz,
            mode: MODE_0,
        }
    }
}

/// SPI bus whose clock and mode can be changed at runtime
///
/// Implement this on top of the HAL's SPI peripheral.
pub trait ConfigureBus: SpiBus<u8> {
    /// Apply the clock rate and mode
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error>;
}

/// A bus that has been configured once for a protocol
#[derive(Debug)]
pub struct ConfiguredBus<S> {
    bus: S,
    config: BusConfig,
}

impl<S: ConfigureBus> ConfiguredBus<S> {
    /// Configure the bus and wrap it
    pub fn new(mut bus: S, config: BusConfig) -> Result<Self, S::Error> {
        bus.configure(&config)?;
        #[cfg(feature = "esp32-log")]
        println!(
            "[ConfiguredBus.new] bus configured at {} Hz, {:?}",
            config.clock_hz, config.mode
        );
        Ok(Self { bus, config })
    }
}

impl<S> ConfiguredBus<S> {
    /// The configuration applied to the bus
    pub const fn config(&self) -> BusConfig {
        self.config
    }

    /// Give back the underlying bus
    pub fn release(self) -> S {
        self.bus
    }

    pub(crate) fn bus_mut(&mut self) -> &mut S {
        &mut self.bus
    }
}

/// Chip-select type for strips with no select line wired
///
/// It has no values, so the only possible select line is `None`, meaning
/// the strip is always listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unwired {}

impl digital::ErrorType for Unwired {
    type Error = Infallible;
}

impl OutputPin for Unwired {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// Run `body` as one selected transfer
///
/// Pulls chip select low, runs the writes, flushes the bus and releases the
/// select line. The select line is released even when a write fails; the bus
/// error is reported in that case.
pub(crate) fn transaction<S, CS, F>(
    bus: &mut S,
    mut chip_select: Option<&mut CS>,
    body: F,
) -> Result<(), Error<S::Error, CS::Error>>
where
    S: SpiBus<u8>,
    CS: OutputPin,
    F: FnOnce(&mut S) -> Result<(), S::Error>,
{
    if let Some(pin) = chip_select.as_deref_mut() {
        pin.set_low().map_err(Error::ChipSelect)?;
    }

    let written = body(&mut *bus).and_then(|()| bus.flush()).map_err(Error::Bus);
    #[cfg(feature = "esp32-log")]
    {
        if written.is_err() {
            println!("[bus.transaction] transfer failed, releasing chip select");
        }
    }

    let released = match chip_select {
        Some(pin) => pin.set_high().map_err(Error::ChipSelect),
        None => Ok(()),
    };

    written.and(released)
}

/// Shorthand for the error type produced by a driver on bus `S` with pin `CS`
pub type DriverError<S, CS> =
    Error<<S as spi::ErrorType>::Error, <CS as digital::ErrorType>::Error>;
