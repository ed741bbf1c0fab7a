//! Rendering logic for ASCII frames.
//!
//! Frames are downsampled into a character grid by averaging luminance over
//! the block of source pixels behind each cell, then mapping that average onto
//! an ordered character ramp.

use thiserror::Error;

use crate::AsciiFrame;

/// Default character ramp, darkest first.
pub const DEFAULT_RAMP: &str = "@%#*+=-:. ";

/// Pixels with alpha below this are sampled as white.
pub const ALPHA_CUTOFF: u8 = 128;

/// Error type for character ramp construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RampError {
    #[error("character ramp must contain at least one character")]
    Empty,
}

/// Perceived brightness of an RGB colour in 8-bit space.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    // Integer weights keep pure white at exactly 255.0
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    weighted as f64 / 1000.0
}

/// Ordered characters used to draw brightness, darkest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterRamp {
    chars: Vec<char>,
}

impl CharacterRamp {
    /// Build a ramp from a string, one glyph per `char`.
    pub fn new(ramp: &str) -> Result<Self, RampError> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return Err(RampError::Empty);
        }
        Ok(Self { chars })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Map a luminance in `[0, 255]` to a ramp index.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use ascii_stage::CharacterRamp;
    ///
    /// let ramp = CharacterRamp::new(" .:-=+*#%@").unwrap();
    /// assert_eq!(ramp.index_for(0.0), 0);
    /// assert_eq!(ramp.index_for(128.0), 4); // floor(128 / 255 * 9)
    /// assert_eq!(ramp.index_for(255.0), 9);
    /// ```
    pub fn index_for(&self, luminance: f64) -> usize {
        let last = self.chars.len() - 1;
        let scaled = (luminance / 255.0 * last as f64).floor();
        if scaled.is_nan() || scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(last)
        }
    }

    /// Glyph for a luminance in `[0, 255]`.
    #[inline]
    pub fn char_for(&self, luminance: f64) -> char {
        self.chars[self.index_for(luminance)]
    }

    /// Lightest glyph in the ramp.
    #[inline]
    pub fn lightest(&self) -> char {
        self.chars[self.chars.len() - 1]
    }
}

impl Default for CharacterRamp {
    fn default() -> Self {
        Self {
            chars: DEFAULT_RAMP.chars().collect(),
        }
    }
}

/// Render a frame into a `grid_width` x `grid_height` block of text.
///
/// Every row ends with a newline. A zero grid dimension renders as an empty
/// string.
///
/// ## Example
///
/// ```rust
/// use ascii_stage::{render_frame, AsciiFrame, CharacterRamp};
///
/// let ramp = CharacterRamp::new("#.").unwrap();
/// let black = AsciiFrame::solid(4, 2, [0, 0, 0, 255], 100).unwrap();
/// assert_eq!(render_frame(&black, 2, 1, &ramp), "##\n");
///
/// let clear = AsciiFrame::solid(4, 2, [0, 0, 0, 0], 100).unwrap();
/// assert_eq!(render_frame(&clear, 2, 1, &ramp), "..\n");
/// ```
pub fn render_frame(frame: &AsciiFrame, grid_width: u32, grid_height: u32, ramp: &CharacterRamp) -> String {
    if grid_width == 0 || grid_height == 0 {
        return String::new();
    }

    let img_width = frame.width() as usize;
    let img_height = frame.height() as usize;
    let cols = grid_width as usize;
    let rows = grid_height as usize;
    let cell_width = img_width as f64 / cols as f64;
    let cell_height = img_height as f64 / rows as f64;

    let mut text = String::with_capacity((cols + 1) * rows);

    for y in 0..rows {
        let start_y = (y as f64 * cell_height).floor() as usize;
        let end_y = (((y + 1) as f64 * cell_height).ceil() as usize).min(img_height);

        for x in 0..cols {
            let start_x = (x as f64 * cell_width).floor() as usize;
            let end_x = (((x + 1) as f64 * cell_width).ceil() as usize).min(img_width);

            let average = block_luminance(frame, start_x..end_x, start_y..end_y);
            text.push(ramp.char_for(average));
        }
        text.push('\n');
    }

    text
}

/// Average luminance over a block of source pixels.
///
/// Transparent pixels count as white; an empty block averages to white.
fn block_luminance(frame: &AsciiFrame, xs: std::ops::Range<usize>, ys: std::ops::Range<usize>) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;

    for py in ys {
        for px in xs.clone() {
            let Some([r, g, b, a]) = frame.rgba_at(px, py) else {
                continue;
            };
            total += if a < ALPHA_CUTOFF { 255.0 } else { luminance(r, g, b) };
            count += 1;
        }
    }

    if count == 0 {
        255.0
    } else {
        total / count as f64
    }
}
