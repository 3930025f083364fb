use core::fmt;

use crate::bus::BusConfig;

/// Error returned by frame construction and range updates.
///
/// Frames are never modified when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Storage length does not match `pixel_count * bytes_per_pixel`
    InvalidLength { expected: usize, actual: usize },
    /// Fixed-capacity storage cannot hold the requested pixels
    InsufficientCapacity { required: usize, capacity: usize },
    /// Range start is past its end
    InvalidRange { start: usize, end: usize },
    /// Range end addresses a pixel the frame does not have
    RangeOutOfBounds { end: usize, pixel_count: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "frame storage is {actual} bytes, expected {expected}")
            }
            Self::InsufficientCapacity { required, capacity } => {
                write!(f, "frame needs {required} bytes, capacity is {capacity}")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "pixel range {start}..={end} is inverted")
            }
            Self::RangeOutOfBounds { end, pixel_count } => {
                write!(f, "pixel {end} is out of bounds for {pixel_count} pixels")
            }
        }
    }
}

impl core::error::Error for FrameError {}

/// Error returned by the strip drivers.
///
/// `B` is the bus error type and `P` is the chip-select pin error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<B, P> {
    /// The bus write or flush failed; passed through unchanged
    Bus(B),
    /// Driving the chip-select line failed
    ChipSelect(P),
    /// The bus handle was configured for a different protocol
    BusConfig {
        expected: BusConfig,
        actual: BusConfig,
    },
}

impl<B: fmt::Debug, P: fmt::Debug> fmt::Display for Error<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "bus transfer failed: {err:?}"),
            Self::ChipSelect(err) => write!(f, "chip select failed: {err:?}"),
            Self::BusConfig { expected, actual } => write!(
                f,
                "bus configured at {} Hz ({:?}), expected {} Hz ({:?})",
                actual.clock_hz, actual.mode, expected.clock_hz, expected.mode
            ),
        }
    }
}

impl<B: fmt::Debug, P: fmt::Debug> core::error::Error for Error<B, P> {}
