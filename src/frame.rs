//! Wire frame storage.
//!
//! A [`WireFrame`] is a byte buffer sized for a fixed number of pixels of one
//! protocol. The storage is supplied by the caller (array, slice or
//! `heapless::Vec`); the frame only checks and remembers its shape.

use crate::error::FrameError;

/// Encoded pixel bytes for one strip
///
/// `BYTES_PER_PIXEL` is the per-pixel width of the protocol. The length of
/// the storage always equals `pixel_count * BYTES_PER_PIXEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireFrame<B, const BYTES_PER_PIXEL: usize> {
    storage: B,
    pixel_count: usize,
}

impl<B, const BYTES_PER_PIXEL: usize> WireFrame<B, BYTES_PER_PIXEL>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap caller storage holding exactly `pixel_count` pixels
    pub fn new(storage: B, pixel_count: usize) -> Result<Self, FrameError> {
        let expected = pixel_count.saturating_mul(BYTES_PER_PIXEL);
        let actual = storage.as_ref().len();
        if actual != expected {
            return Err(FrameError::InvalidLength { expected, actual });
        }
        Ok(Self {
            storage,
            pixel_count,
        })
    }

    /// Number of pixels the frame holds
    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Encoded bytes, ready to be written to the bus
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_ref()
    }

    /// Encoded bytes of one pixel
    pub fn pixel(&self, index: usize) -> Option<&[u8]> {
        if index >= self.pixel_count {
            return None;
        }
        let start = index * BYTES_PER_PIXEL;
        self.storage.as_ref().get(start..start + BYTES_PER_PIXEL)
    }

    /// Give back the storage
    pub fn into_inner(self) -> B {
        self.storage
    }

    pub(crate) fn pixel_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.pixel_count {
            return None;
        }
        let start = index * BYTES_PER_PIXEL;
        self.storage.as_mut().get_mut(start..start + BYTES_PER_PIXEL)
    }

    /// Bytes of the inclusive pixel range `start..=end`
    pub(crate) fn range_mut(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<&mut [u8], FrameError> {
        if start > end {
            return Err(FrameError::InvalidRange { start, end });
        }
        if end >= self.pixel_count {
            return Err(FrameError::RangeOutOfBounds {
                end,
                pixel_count: self.pixel_count,
            });
        }
        let bytes = self.storage.as_mut();
        Ok(&mut bytes[start * BYTES_PER_PIXEL..(end + 1) * BYTES_PER_PIXEL])
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        self.storage.as_mut()
    }
}

impl<const LEN: usize, const BYTES_PER_PIXEL: usize> WireFrame<[u8; LEN], BYTES_PER_PIXEL> {
    /// Zero-filled frame backed by an array
    ///
    /// The pixel count is `LEN / BYTES_PER_PIXEL`; a `LEN` that is not a
    /// whole number of pixels fails to compile.
    pub const fn zeroed() -> Self {
        const {
            assert!(
                LEN % BYTES_PER_PIXEL == 0,
                "frame length must be a whole number of pixels"
            );
        }
        Self {
            storage: [0; LEN],
            pixel_count: LEN / BYTES_PER_PIXEL,
        }
    }
}

impl<const CAP: usize, const BYTES_PER_PIXEL: usize>
    WireFrame<heapless::Vec<u8, CAP>, BYTES_PER_PIXEL>
{
    /// Zero-filled frame for `pixel_count` pixels in fixed-capacity storage
    pub fn with_pixels(pixel_count: usize) -> Result<Self, FrameError> {
        let required = pixel_count.saturating_mul(BYTES_PER_PIXEL);
        let mut storage = heapless::Vec::new();
        storage
            .resize(required, 0)
            .map_err(|()| FrameError::InsufficientCapacity {
                required,
                capacity: CAP,
            })?;
        Ok(Self {
            storage,
            pixel_count,
        })
    }
}

/// Number of bytes a frame of `pixel_count` pixels needs
///
/// Handy for sizing array storage: `[u8; frame_len(8, 12)]`.
pub const fn frame_len(pixel_count: usize, bytes_per_pixel: usize) -> usize {
    pixel_count * bytes_per_pixel
}
