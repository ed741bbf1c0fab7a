//! GIF→ASCII background renderer.
//!
//! Loading and playback run on separate tokio tasks that share the decoded
//! frame list through a watch channel: a load swaps in a whole new
//! `Arc<[AsciiFrame]>` in one assignment and the playback loop only reads it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, RendererConfig};
use crate::decode::{decode_visible_frames, DecodeError};
use crate::source::{FrameSource, SourceError};
use crate::{render_frame, AsciiFrame, CharacterRamp, PlaybackClock};

/// Shortest wake-up period of the playback loop.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// Error type for a failed load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The blocking decode task panicked or was cancelled
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Where the most recent load stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading { url: String },
    /// Frames are in place; `frames` may be zero if every frame was blank
    Ready { url: String, frames: usize },
    /// Fetch or decode failed; the previous frames are still shown
    Failed { url: String, error: String },
}

/// Grid, glyph and timing settings for a renderer.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub grid_width: u32,
    pub grid_height: u32,
    pub ramp: CharacterRamp,
    pub fps: f64,
    /// Wake-up period of the playback loop, at least [`MIN_REFRESH_INTERVAL`]
    pub refresh_interval: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            grid_width: 100,
            grid_height: 30,
            ramp: CharacterRamp::default(),
            fps: 15.0,
            refresh_interval: Duration::from_millis(16),
        }
    }
}

impl TryFrom<&RendererConfig> for RenderSettings {
    type Error = ConfigError;

    fn try_from(config: &RendererConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            ramp: config.ramp()?,
            fps: config.frames_per_second,
            refresh_interval: config.refresh_interval(),
        })
    }
}

/// Shared pieces a spawned task needs.
#[derive(Debug)]
struct Shared {
    settings: RenderSettings,
    frames: watch::Sender<Arc<[AsciiFrame]>>,
    text: watch::Sender<String>,
    status: watch::Sender<LoadStatus>,
    generation: AtomicU64,
}

impl Shared {
    fn render(&self, frame: &AsciiFrame) -> String {
        render_frame(frame, self.settings.grid_width, self.settings.grid_height, &self.settings.ramp)
    }
}

/// Renders an animated GIF as a block of monospace text.
///
/// `load()` fetches and decodes a source, `start()` and `stop()` control the
/// playback loop, and the current text is observable through `text()` or
/// `subscribe_text()`. Dropping the renderer cancels both tasks.
///
/// Failures never reach the caller: they are logged and leave the last good
/// text in place.
#[derive(Debug)]
pub struct GifAsciiRenderer<S> {
    source: Arc<S>,
    shared: Arc<Shared>,
    load_task: Option<JoinHandle<()>>,
    playback_task: Option<JoinHandle<()>>,
}

impl<S: FrameSource> GifAsciiRenderer<S> {
    pub fn new(source: S, settings: RenderSettings) -> Self {
        let empty: Arc<[AsciiFrame]> = Arc::from(Vec::new());
        let (frames, _) = watch::channel(empty);
        let (text, _) = watch::channel(String::new());
        let (status, _) = watch::channel(LoadStatus::Idle);

        Self {
            source: Arc::new(source),
            shared: Arc::new(Shared {
                settings,
                frames,
                text,
                status,
                generation: AtomicU64::new(0),
            }),
            load_task: None,
            playback_task: None,
        }
    }

    /// Build a renderer from validated configuration.
    pub fn from_config(source: S, config: &RendererConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(source, RenderSettings::try_from(config)?))
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.shared.settings
    }

    /// Fetch and decode `url` in the background.
    ///
    /// The latest call wins: an earlier load still in flight is aborted and
    /// its result, if it races past the abort, is discarded. On success the
    /// first visible frame is rendered immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(&mut self, url: impl Into<String>) {
        let url = url.into();
        if let Some(previous) = self.load_task.take() {
            previous.abort();
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.status.send_replace(LoadStatus::Loading { url: url.clone() });

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        self.load_task = Some(tokio::spawn(async move {
            let result = fetch_frames(source.as_ref(), &url).await;

            if shared.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(url = %url, "discarding superseded load");
                return;
            }

            match result {
                Ok(frames) => {
                    let count = frames.len();
                    let first = frames.first().map(|frame| shared.render(frame)).unwrap_or_default();
                    shared.frames.send_replace(Arc::from(frames));
                    shared.text.send_replace(first);
                    tracing::debug!(url = %url, frames = count, "frames ready");
                    shared.status.send_replace(LoadStatus::Ready { url, frames: count });
                }
                Err(err) => {
                    tracing::error!(url = %url, error = %err, "failed to load ASCII background");
                    shared.status.send_replace(LoadStatus::Failed {
                        url,
                        error: err.to_string(),
                    });
                }
            }
        }));
    }

    /// Wait for the in-flight load, if any, to finish.
    pub async fn wait_for_load(&mut self) {
        if let Some(handle) = self.load_task.take() {
            // Aborted loads surface as a JoinError; nothing to report
            let _ = handle.await;
        }
    }

    /// Start the playback loop.
    ///
    /// Restarting an already running loop begins again from the first frame.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        self.stop();

        let shared = Arc::clone(&self.shared);
        self.playback_task = Some(tokio::spawn(async move {
            let mut frames_rx = shared.frames.subscribe();
            let mut frames = Arc::clone(&frames_rx.borrow_and_update());

            let origin = tokio::time::Instant::now();
            let now_ms = || origin.elapsed().as_micros() as f64 / 1000.0;

            let mut clock = PlaybackClock::new(shared.settings.fps);
            clock.set_frames(frames.len(), 0.0);
            clock.start(0.0);

            let period = shared.settings.refresh_interval.max(MIN_REFRESH_INTERVAL);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let now = now_ms();

                if frames_rx.has_changed().unwrap_or(false) {
                    frames = Arc::clone(&frames_rx.borrow_and_update());
                    clock.set_frames(frames.len(), now);
                }

                if let Some(index) = clock.tick(now) {
                    if let Some(frame) = frames.get(index) {
                        shared.text.send_replace(shared.render(frame));
                    }
                }
            }
        }));
        tracing::debug!("ASCII playback started");
    }

    /// Stop the playback loop. The last rendered text stays in place.
    pub fn stop(&mut self) {
        if let Some(handle) = self.playback_task.take() {
            handle.abort();
            tracing::debug!("ASCII playback stopped");
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playback_task.is_some()
    }

    /// Currently rendered text.
    pub fn text(&self) -> String {
        self.shared.text.borrow().clone()
    }

    /// Observe every re-render.
    pub fn subscribe_text(&self) -> watch::Receiver<String> {
        self.shared.text.subscribe()
    }

    pub fn status(&self) -> LoadStatus {
        self.shared.status.borrow().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.shared.frames.borrow().len()
    }

    /// Snapshot of the current frame list.
    pub fn frames(&self) -> Arc<[AsciiFrame]> {
        Arc::clone(&self.shared.frames.borrow())
    }
}

impl<S> Drop for GifAsciiRenderer<S> {
    fn drop(&mut self) {
        for handle in [self.load_task.take(), self.playback_task.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

async fn fetch_frames<S: FrameSource>(source: &S, url: &str) -> Result<Vec<AsciiFrame>, LoadError> {
    let bytes = source.fetch(url).await?;
    // Decoding a large animation takes a while; keep it off the async workers
    let frames = tokio::task::spawn_blocking(move || decode_visible_frames(&bytes)).await??;
    Ok(frames)
}
