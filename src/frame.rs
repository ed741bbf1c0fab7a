//! Decoded animation frames.

use thiserror::Error;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Error type for frame construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Width or height is zero
    #[error("invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// Pixel buffer length doesn't match `width * height * 4`
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A single decoded animation frame.
///
/// Holds a full-canvas RGBA pixel buffer. Frames are immutable once built;
/// a decoded frame list is replaced wholesale rather than edited in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiFrame {
    pixels: Vec<u8>,
    delay_ms: u32,
    width: u32,
    height: u32,
}

impl AsciiFrame {
    /// Create a frame from an RGBA buffer.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use ascii_stage::AsciiFrame;
    ///
    /// let frame = AsciiFrame::new(vec![0; 2 * 1 * 4], 2, 1, 100).unwrap();
    /// assert_eq!(frame.pixel_count(), 2);
    ///
    /// assert!(AsciiFrame::new(vec![0; 3], 2, 1, 100).is_err());
    /// ```
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, delay_ms: u32) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            delay_ms,
            width,
            height,
        })
    }

    /// Create a frame where every pixel has the same RGBA value.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4], delay_ms: u32) -> Result<Self, FrameError> {
        let count = width as usize * height as usize;
        let pixels = rgba.repeat(count);
        Self::new(pixels, width, height, delay_ms)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame delay as stored in the source container.
    #[inline]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the RGBA value at the given position.
    ///
    /// Returns None if position is out of bounds.
    #[inline]
    pub fn rgba_at(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let width = self.width as usize;
        if x >= width || y >= self.height as usize {
            return None;
        }
        let idx = (y * width + x) * BYTES_PER_PIXEL;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Iterate over pixels as `[r, g, b, a]`.
    pub fn rgba_pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_validates_dimensions() {
        assert_eq!(
            AsciiFrame::new(Vec::new(), 0, 4, 100),
            Err(FrameError::InvalidDimensions { width: 0, height: 4 })
        );
        assert_eq!(
            AsciiFrame::new(vec![0; 8], 2, 2, 100),
            Err(FrameError::SizeMismatch {
                expected: 16,
                actual: 8
            })
        );
    }

    #[test]
    fn test_rgba_at() {
        let pixels = vec![
            255, 0, 0, 255, // (0, 0) red
            0, 255, 0, 255, // (1, 0) green
            0, 0, 255, 255, // (0, 1) blue
            9, 9, 9, 0, // (1, 1) transparent
        ];
        let frame = AsciiFrame::new(pixels, 2, 2, 40).unwrap();

        assert_eq!(frame.rgba_at(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(frame.rgba_at(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(frame.rgba_at(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(frame.rgba_at(1, 1), Some([9, 9, 9, 0]));
        assert_eq!(frame.rgba_at(2, 0), None);
        assert_eq!(frame.rgba_at(0, 2), None);
    }

    #[test]
    fn test_solid() {
        let frame = AsciiFrame::solid(3, 2, [1, 2, 3, 4], 70).unwrap();
        assert_eq!(frame.pixels().len(), 24);
        assert_eq!(frame.delay_ms(), 70);
        assert!(frame.rgba_pixels().all(|px| px == [1, 2, 3, 4]));
    }
}
