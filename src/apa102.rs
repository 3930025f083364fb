//! APA102 clocked LED protocol
//!
//! Every pixel is four bytes: a brightness header followed by blue, green
//! and red. A transmission is a start frame of four zero bytes, the pixel
//! bytes, and an end frame of `0xFF` bytes.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{MODE_0, SpiBus};
use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::bus::{BusConfig, ConfiguredBus, DriverError, Unwired, transaction};
use crate::color::{Rgb, bgr_bytes};
use crate::error::Error;
use crate::frame::WireFrame;

/// Bytes per encoded pixel
pub const BYTES_PER_PIXEL: usize = 4;
/// Largest brightness value the header can carry
pub const MAX_BRIGHTNESS: u8 = 31;
/// Top three bits every header must carry
pub const HEADER_MARKER: u8 = 0b1110_0000;
/// Start of every transmission
pub const START_FRAME: [u8; 4] = [0x00; 4];
/// Default number of `0xFF` bytes closing a transmission
///
/// Four bytes clock data through short chains only. Long chains need more;
/// set [`Apa102Config::end_frame_len`] accordingly.
pub const DEFAULT_END_FRAME_LEN: usize = 4;
/// Fastest clock the LEDs are driven at
pub const MAX_CLOCK_HZ: u32 = 1_000_000;
/// Bus settings the driver expects
pub const BUS_CONFIG: BusConfig = BusConfig::mode0(MAX_CLOCK_HZ);

const END_FRAME_CHUNK: [u8; 4] = [0xFF; 4];

/// Frame holding APA102 pixels
pub type Apa102Frame<B> = WireFrame<B, BYTES_PER_PIXEL>;

/// Build the header byte for a brightness level
///
/// Brightness above [`MAX_BRIGHTNESS`] saturates.
#[inline]
pub const fn brightness_header(brightness: u8) -> u8 {
    let brightness = if brightness > MAX_BRIGHTNESS {
        MAX_BRIGHTNESS
    } else {
        brightness
    };
    HEADER_MARKER | brightness
}

/// Encode one pixel as `[header, blue, green, red]`
#[inline]
pub const fn encode_pixel(color: Rgb, brightness: u8) -> [u8; BYTES_PER_PIXEL] {
    let [b, g, r] = bgr_bytes(color);
    [brightness_header(brightness), b, g, r]
}

impl<B> Apa102Frame<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Update one pixel
    ///
    /// An index past the end of the frame is ignored.
    pub fn set_pixel(&mut self, index: usize, color: Rgb, brightness: u8) {
        let Some(bytes) = self.pixel_mut(index) else {
            #[cfg(feature = "esp32-log")]
            println!("[Apa102Frame.set_pixel] index {} ignored", index);
            return;
        };
        bytes.copy_from_slice(&encode_pixel(color, brightness));
    }

    /// Update pixels by position, starting from the first one
    ///
    /// A shorter slice leaves the remaining pixels as they are.
    pub fn set_pixels(&mut self, colors: &[Rgb], brightness: u8) {
        for (index, color) in colors.iter().enumerate() {
            self.set_pixel(index, *color, brightness);
        }
    }

    /// Set every pixel to the same color
    pub fn fill(&mut self, color: Rgb, brightness: u8) {
        let encoded = encode_pixel(color, brightness);
        for chunk in self.bytes_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&encoded);
        }
    }
}

/// Driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apa102Config {
    /// Brightness used when writing colors through [`SmartLedsWrite`]
    pub brightness: u8,
    /// Number of `0xFF` bytes sent after the pixels
    pub end_frame_len: usize,
}

impl Default for Apa102Config {
    fn default() -> Self {
        Self {
            brightness: MAX_BRIGHTNESS,
            end_frame_len: DEFAULT_END_FRAME_LEN,
        }
    }
}

/// APA102 strip driver
///
/// Owns the configured bus and the optional chip-select line. The select
/// line is active low.
pub struct Apa102<S, CS = Unwired> {
    bus: ConfiguredBus<S>,
    chip_select: Option<CS>,
    config: Apa102Config,
}

impl<S: SpiBus<u8>> Apa102<S, Unwired> {
    /// Driver for a strip without a chip-select line
    pub fn new(bus: ConfiguredBus<S>) -> Result<Self, DriverError<S, Unwired>> {
        Self::build(bus, None)
    }
}

impl<S: SpiBus<u8>, CS: OutputPin> Apa102<S, CS> {
    /// Driver for a strip behind a chip-select line
    pub fn with_chip_select(
        bus: ConfiguredBus<S>,
        chip_select: CS,
    ) -> Result<Self, DriverError<S, CS>> {
        Self::build(bus, Some(chip_select))
    }

    fn build(bus: ConfiguredBus<S>, chip_select: Option<CS>) -> Result<Self, DriverError<S, CS>> {
        let actual = bus.config();
        if actual.mode != MODE_0 || actual.clock_hz > MAX_CLOCK_HZ {
            return Err(Error::BusConfig {
                expected: BUS_CONFIG,
                actual,
            });
        }
        Ok(Self {
            bus,
            chip_select,
            config: Apa102Config::default(),
        })
    }

    /// Replace the driver settings
    #[must_use]
    pub fn with_config(mut self, config: Apa102Config) -> Self {
        self.config = config;
        self
    }

    /// Current driver settings
    pub const fn config(&self) -> &Apa102Config {
        &self.config
    }

    /// Send a frame to the strip
    pub fn update<B>(&mut self, frame: &Apa102Frame<B>) -> Result<(), DriverError<S, CS>>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.transmit(frame.as_bytes())
    }

    /// Send already encoded pixel bytes wrapped in start and end frames
    pub fn transmit(&mut self, body: &[u8]) -> Result<(), DriverError<S, CS>> {
        let end_frame_len = self.config.end_frame_len;
        transaction(self.bus.bus_mut(), self.chip_select.as_mut(), |bus| {
            bus.write(&START_FRAME)?;
            bus.write(body)?;
            write_end_frame(bus, end_frame_len)
        })
    }

    /// Take the bus handle and select line back
    pub fn release(self) -> (ConfiguredBus<S>, Option<CS>) {
        (self.bus, self.chip_select)
    }
}

impl<S: SpiBus<u8>, CS: OutputPin> SmartLedsWrite for Apa102<S, CS> {
    type Error = DriverError<S, CS>;
    type Color = Rgb;

    /// Stream colors to the strip at the configured brightness
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let Apa102Config {
            brightness,
            end_frame_len,
        } = self.config;
        transaction(self.bus.bus_mut(), self.chip_select.as_mut(), |bus| {
            bus.write(&START_FRAME)?;
            for color in iterator {
                bus.write(&encode_pixel(color.into(), brightness))?;
            }
            write_end_frame(bus, end_frame_len)
        })
    }
}

fn write_end_frame<S: SpiBus<u8>>(bus: &mut S, len: usize) -> Result<(), S::Error> {
    let mut remaining = len;
    while remaining > 0 {
        let chunk = remaining.min(END_FRAME_CHUNK.len());
        bus.write(&END_FRAME_CHUNK[..chunk])?;
        remaining -= chunk;
    }
    Ok(())
}
