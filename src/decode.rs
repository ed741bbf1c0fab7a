//! GIF container decoding.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use thiserror::Error;

use crate::frame::AsciiFrame;

/// Delay used when a frame declares none.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Frames with a mean alpha below this are treated as transparent.
pub const BLANK_ALPHA_THRESHOLD: f64 = 10.0;

/// Frames with a mean channel brightness above this are treated as white.
pub const BLANK_BRIGHTNESS_THRESHOLD: f64 = 250.0;

/// Error type for decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a readable GIF
    #[error("failed to decode GIF: {0}")]
    Image(#[from] image::ImageError),
}

/// Decode every frame of an animated (or static) GIF.
///
/// Frames are fully composited canvases, so each one can be rendered on its
/// own. A zero delay is replaced by [`DEFAULT_FRAME_DELAY_MS`]. Frames with an
/// unusable buffer are skipped with a warning.
pub fn decode_gif(bytes: &[u8]) -> Result<Vec<AsciiFrame>, DecodeError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let frames = to_ascii_frames(decoder.into_frames().collect_frames()?);

    tracing::debug!(frames = frames.len(), "decoded GIF");
    Ok(frames)
}

fn to_ascii_frames(decoded: Vec<image::Frame>) -> Vec<AsciiFrame> {
    let mut frames = Vec::with_capacity(decoded.len());
    for (index, frame) in decoded.into_iter().enumerate() {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay_ms = if denom > 0 { numer / denom } else { 0 };
        let delay_ms = if delay_ms == 0 { DEFAULT_FRAME_DELAY_MS } else { delay_ms };

        let buffer = frame.into_buffer();
        let (width, height) = buffer.dimensions();
        match AsciiFrame::new(buffer.into_raw(), width, height, delay_ms) {
            Ok(frame) => frames.push(frame),
            Err(err) => tracing::warn!(index, error = %err, "skipping malformed frame"),
        }
    }
    frames
}

/// Check whether a frame carries no visible content.
///
/// A frame is blank when it is mostly transparent (mean alpha below 10) or
/// mostly white (mean of `(r + g + b) / 3` above 250). Many source GIFs open
/// with such a frame, which shows up as a flash if played.
pub fn is_blank_frame(frame: &AsciiFrame) -> bool {
    let pixel_count = frame.pixel_count();
    if pixel_count == 0 {
        return true;
    }

    let mut total_alpha = 0u64;
    let mut total_brightness = 0.0;
    for [r, g, b, a] in frame.rgba_pixels() {
        total_alpha += a as u64;
        total_brightness += (r as f64 + g as f64 + b as f64) / 3.0;
    }

    let mean_alpha = total_alpha as f64 / pixel_count as f64;
    let mean_brightness = total_brightness / pixel_count as f64;

    mean_alpha < BLANK_ALPHA_THRESHOLD || mean_brightness > BLANK_BRIGHTNESS_THRESHOLD
}

/// Decode a GIF and drop blank frames.
///
/// An all-blank source yields an empty list, not an error.
pub fn decode_visible_frames(bytes: &[u8]) -> Result<Vec<AsciiFrame>, DecodeError> {
    let mut frames = decode_gif(bytes)?;
    let before = frames.len();
    frames.retain(|frame| !is_blank_frame(frame));

    let dropped = before - frames.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = frames.len(), "skipped blank frames");
    }
    Ok(frames)
}
