//! # ascii-stage
//!
//! Page-transition coordination and GIF→ASCII background rendering.
//!
//! This crate provides platform-agnostic building blocks for:
//! - Tracking a two-phase cover/reveal transition in an observable store
//! - Sequencing navigation behind a two-layer overlay with fixed timings
//! - Decoding animated GIFs and dropping blank frames
//! - Rendering RGBA frames to text through a character ramp
//! - Playing the rendered frames back at a configurable frame rate
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for state and config types
//! - `toml` - Load [`StageConfig`] from TOML
//! - `http` - Fetch GIFs over HTTP with [`HttpSource`]
//! - `web` - Apply overlay frames and ASCII text to DOM elements
//!
//! ## Example
//!
//! ```rust,ignore
//! use ascii_stage::{FileSource, GifAsciiRenderer, StageConfig, TransitionDirector, TransitionStore};
//!
//! let config = StageConfig::from_toml_str(&std::fs::read_to_string("stage.toml")?)?;
//!
//! // Background animation
//! let mut renderer = GifAsciiRenderer::from_config(FileSource::new(), &config.renderer)?;
//! renderer.load(&config.renderer.source_url);
//! renderer.start();
//!
//! // Page transitions
//! let store = TransitionStore::new();
//! let mut director = TransitionDirector::new(store.clone(), config.transitions, router);
//! director.navigate("/about", "/");
//! ```

mod choreography;
mod config;
mod decode;
mod frame;
mod overlay;
mod playback;
pub mod render;
mod renderer;
mod source;
mod timing;
mod transition;

#[cfg(feature = "web")]
pub mod web;

pub use choreography::{classify_link, LinkKind, NavigationOutcome, Navigator, TransitionDirector};
pub use config::{ConfigError, RendererConfig, StageConfig};
pub use decode::{decode_gif, decode_visible_frames, is_blank_frame, DecodeError};
pub use frame::{AsciiFrame, FrameError};
pub use overlay::{overlay_frames, Easing, LayerFrame, OverlayLayer};
pub use playback::{PlaybackClock, PlaybackState};
pub use render::{luminance, render_frame, CharacterRamp, RampError};
pub use renderer::{GifAsciiRenderer, LoadError, LoadStatus, RenderSettings, MIN_REFRESH_INTERVAL};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{FileSource, FrameSource, SourceError};
pub use timing::{TimingError, TransitionTimings};
pub use transition::{TransitionKind, TransitionPhase, TransitionState, TransitionStore};
