//! WS2812B single-wire protocol emulated over SPI
//!
//! The bus runs at 4 MHz, so one SPI bit lasts 250 ns. Every color bit is
//! sent as a 4-bit symbol: `1110` for a one (750 ns high, 250 ns low) and
//! `1000` for a zero (250 ns high, 750 ns low). Two symbols share a byte,
//! the first one in the high nibble, which gives 12 bytes per pixel.
//!
//! Colors go out as a 24-bit `0xGGRRBB` word, most significant bit first.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::bus::{BusConfig, ConfiguredBus, DriverError, Unwired, transaction};
use crate::color::{Rgb, color_word, rgb_from_word};
use crate::error::{Error, FrameError};
use crate::frame::WireFrame;

/// Bytes per encoded pixel
pub const BYTES_PER_PIXEL: usize = 12;
/// Symbol for a one bit
pub const SYMBOL_ONE: u8 = 0b1110;
/// Symbol for a zero bit
pub const SYMBOL_ZERO: u8 = 0b1000;
/// Clock rate the symbol timings are computed for
pub const CLOCK_HZ: u32 = 4_000_000;
/// Bus settings the driver expects
pub const BUS_CONFIG: BusConfig = BusConfig::mode0(CLOCK_HZ);

const COLOR_BITS: u32 = 24;

/// Frame holding WS2812B pixels
pub type Ws2812bFrame<B> = WireFrame<B, BYTES_PER_PIXEL>;

#[inline]
const fn symbol(bit: u32) -> u8 {
    if bit == 1 { SYMBOL_ONE } else { SYMBOL_ZERO }
}

/// Encode one pixel into its 12 symbol bytes
#[allow(clippy::cast_possible_truncation)]
pub const fn encode_pixel(color: Rgb) -> [u8; BYTES_PER_PIXEL] {
    let word = color_word(color);
    let mut bytes = [0u8; BYTES_PER_PIXEL];
    let mut i = 0;
    while i < BYTES_PER_PIXEL {
        let shift = COLOR_BITS - 2 * (i as u32 + 1);
        let pair = (word >> shift) & 0b11;
        bytes[i] = (symbol(pair >> 1) << 4) | symbol(pair & 1);
        i += 1;
    }
    bytes
}

/// Read a pixel back from its symbol bytes
///
/// Each nibble is read by majority: three or more set bits is a one.
pub const fn decode_pixel(bytes: &[u8; BYTES_PER_PIXEL]) -> Rgb {
    let mut word = 0u32;
    let mut i = 0;
    while i < BYTES_PER_PIXEL {
        let high = bytes[i] >> 4;
        let low = bytes[i] & 0x0F;
        word = (word << 2) | (symbol_bit(high) << 1) | symbol_bit(low);
        i += 1;
    }
    rgb_from_word(word)
}

#[inline]
#[allow(clippy::bool_to_int_with_if)]
const fn symbol_bit(nibble: u8) -> u32 {
    if nibble.count_ones() > 2 { 1 } else { 0 }
}

impl<B> Ws2812bFrame<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Set pixels `start..=end` to one color
    ///
    /// Bytes outside the range are left untouched. An inverted or
    /// out-of-bounds range writes nothing and returns an error.
    pub fn set_range(&mut self, color: Rgb, start: usize, end: usize) -> Result<(), FrameError> {
        let bytes = self.range_mut(start, end).inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!("[Ws2812bFrame.set_range] rejected {}..={}: {}", start, end, _err);
        })?;
        let encoded = encode_pixel(color);
        for chunk in bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&encoded);
        }
        Ok(())
    }

    /// Set one pixel
    pub fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), FrameError> {
        self.set_range(color, index, index)
    }

    /// Set every pixel to one color
    pub fn set_all(&mut self, color: Rgb) {
        let encoded = encode_pixel(color);
        for chunk in self.bytes_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&encoded);
        }
    }

    /// Update pixels by position, starting from the first one
    ///
    /// A shorter slice leaves the remaining pixels as they are; extra
    /// colors are ignored.
    pub fn set_pixels(&mut self, colors: &[Rgb]) {
        for (index, color) in colors.iter().enumerate() {
            let Some(bytes) = self.pixel_mut(index) else {
                break;
            };
            bytes.copy_from_slice(&encode_pixel(*color));
        }
    }
}

/// WS2812B strip driver
///
/// Many boards tie the data line straight to MOSI; in that case use
/// [`Ws2812b::new`] and no select line is driven.
pub struct Ws2812b<S, CS = Unwired> {
    bus: ConfiguredBus<S>,
    chip_select: Option<CS>,
}

impl<S: SpiBus<u8>> Ws2812b<S, Unwired> {
    /// Driver for a strip without a chip-select line
    pub fn new(bus: ConfiguredBus<S>) -> Result<Self, DriverError<S, Unwired>> {
        Self::build(bus, None)
    }
}

impl<S: SpiBus<u8>, CS: OutputPin> Ws2812b<S, CS> {
    /// Driver for a strip whose data line is gated by a select line
    pub fn with_chip_select(
        bus: ConfiguredBus<S>,
        chip_select: CS,
    ) -> Result<Self, DriverError<S, CS>> {
        Self::build(bus, Some(chip_select))
    }

    fn build(bus: ConfiguredBus<S>, chip_select: Option<CS>) -> Result<Self, DriverError<S, CS>> {
        // Any other clock rate shifts the pulse widths out of tolerance.
        let actual = bus.config();
        if actual != BUS_CONFIG {
            return Err(Error::BusConfig {
                expected: BUS_CONFIG,
                actual,
            });
        }
        Ok(Self { bus, chip_select })
    }

    /// Send a frame to the strip
    pub fn update<B>(&mut self, frame: &Ws2812bFrame<B>) -> Result<(), DriverError<S, CS>>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.transmit(frame.as_bytes())
    }

    /// Send already encoded symbol bytes as they are
    ///
    /// Interrupts are masked for the duration of the write, since a gap
    /// between bytes reads as a reset on the strip. The latch time after
    /// the write is left to the caller.
    pub fn transmit(&mut self, body: &[u8]) -> Result<(), DriverError<S, CS>> {
        let bus = self.bus.bus_mut();
        let chip_select = self.chip_select.as_mut();
        critical_section::with(|_| transaction(bus, chip_select, |bus| bus.write(body)))
    }

    /// Take the bus handle and select line back
    pub fn release(self) -> (ConfiguredBus<S>, Option<CS>) {
        (self.bus, self.chip_select)
    }
}

impl<S: SpiBus<u8>, CS: OutputPin> SmartLedsWrite for Ws2812b<S, CS> {
    type Error = DriverError<S, CS>;
    type Color = Rgb;

    /// Stream colors to the strip, encoding them on the fly
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let bus = self.bus.bus_mut();
        let chip_select = self.chip_select.as_mut();
        critical_section::with(|_| {
            transaction(bus, chip_select, |bus| {
                for color in iterator {
                    bus.write(&encode_pixel(color.into()))?;
                }
                Ok(())
            })
        })
    }
}
